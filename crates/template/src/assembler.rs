//! Walks a template page by page and produces the resolved document.
use crate::config::EngineConfig;
use crate::loops::expand_with;
use crate::report::{AssemblyWarning, Warnings};
use std::collections::{HashMap, HashSet};
use stencil_jpath::Scope;
use stencil_rules::evaluate;
use stencil_types::{Dataset, Document, Page, ResolvedPage, Template};

/// The outcome of an assembly pass together with anything that was silently
/// worked around along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub document: Document,
    pub warnings: Vec<AssemblyWarning>,
}

/// Assembles with the default configuration.
pub fn assemble(template: &Template, dataset: &Dataset) -> Document {
    assemble_with(template, dataset, &EngineConfig::default())
}

pub fn assemble_with(template: &Template, dataset: &Dataset, config: &EngineConfig) -> Document {
    assemble_with_report(template, dataset, config).document
}

/// Assembles every page of `template` against `dataset`.
///
/// Elements are visited in order. Hidden elements are dropped along with any
/// loop they carry; visible looping elements contribute their expansions in
/// place of themselves.
pub fn assemble_with_report(
    template: &Template,
    dataset: &Dataset,
    config: &EngineConfig,
) -> Assembly {
    let scope = Scope::new(dataset);
    let mut warnings = Warnings::new();
    let pages = template
        .pages
        .iter()
        .map(|page| assemble_page(page, &scope, config, &mut warnings))
        .collect();

    Assembly {
        document: Document { pages },
        warnings: warnings.into_vec(),
    }
}

fn assemble_page(
    page: &Page,
    scope: &Scope<'_>,
    config: &EngineConfig,
    warnings: &mut Warnings,
) -> ResolvedPage {
    let mut ids = IdRegistry::default();
    let mut elements = Vec::with_capacity(page.elements.len());

    for element in &page.elements {
        let visible = element
            .conditions
            .as_ref()
            .is_none_or(|condition| evaluate(condition, scope));
        if !visible {
            log::debug!("Element '{}' on page '{}' hidden by its conditions", element.id, page.id);
            continue;
        }

        for mut resolved in expand_with(element, scope, config, warnings) {
            resolved.id = ids.claim(resolved.id);
            if resolved.page_id.is_empty() {
                resolved.page_id = page.id.clone();
            }
            elements.push(resolved);
        }
    }

    log::debug!("Page '{}' resolved to {} elements", page.id, elements.len());
    ResolvedPage {
        id: page.id.clone(),
        elements,
    }
}

/// Hands out page-unique ids. A repeated id gets the first free `_<n>`
/// suffix, counting from 2.
#[derive(Debug, Default)]
struct IdRegistry {
    seen: HashSet<String>,
    next_suffix: HashMap<String, usize>,
}

impl IdRegistry {
    fn claim(&mut self, id: String) -> String {
        if self.seen.insert(id.clone()) {
            return id;
        }
        let n = self.next_suffix.entry(id.clone()).or_insert(2);
        loop {
            let candidate = format!("{}_{}", id, n);
            *n += 1;
            if self.seen.insert(candidate.clone()) {
                log::debug!("Duplicate element id '{}' renamed to '{}'", id, candidate);
                return candidate;
            }
        }
    }
}
