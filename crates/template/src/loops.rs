//! Expansion of repeating elements.
//!
//! A looping element never appears in the output itself; each iteration
//! produces a sibling with id `<base>_loop_<n>`, content resolved against the
//! iteration's locals, and geometry stacked downwards from the template's own
//! position (`x` never changes).
use crate::config::EngineConfig;
use crate::placeholder::resolve_in;
use crate::report::{AssemblyWarning, Warnings};
use serde_json::Value;
use std::fmt::Display;
use stencil_jpath::Scope;
use stencil_rules::evaluate;
use stencil_types::{Condition, Dataset, ElementTemplate, LoopSpec, Rect, ResolvedElement};

/// Expands an element with the default configuration, discarding warnings.
///
/// An element without a loop resolves to exactly one instance.
pub fn expand(template: &ElementTemplate, dataset: &Dataset) -> Vec<ResolvedElement> {
    let mut warnings = Warnings::new();
    expand_with(template, &Scope::new(dataset), &EngineConfig::default(), &mut warnings)
}

/// Expands an element within `scope`, recording ceiling truncations and bad
/// data sources in `warnings`.
pub fn expand_with(
    template: &ElementTemplate,
    scope: &Scope<'_>,
    config: &EngineConfig,
    warnings: &mut Warnings,
) -> Vec<ResolvedElement> {
    let Some(spec) = &template.repeat else {
        let content = resolve_in(&template.content, scope, config.math_precision());
        return vec![ResolvedElement::from_template(
            template,
            template.id.clone(),
            template.rect,
            content,
        )];
    };

    let mut instances = Instances::new(template, config);
    match spec {
        LoopSpec::For { start, end, step } => {
            expand_for(&mut instances, scope, (*start, *end, *step), warnings)
        }
        LoopSpec::Foreach { data_source } => {
            expand_foreach(&mut instances, scope, data_source, warnings)
        }
        LoopSpec::While { condition } => expand_while(&mut instances, scope, condition, warnings),
        LoopSpec::Unknown => warnings.push(AssemblyWarning::UnknownLoop {
            element_id: template.id.clone(),
        }),
    }

    log::debug!(
        "Expanded {} loop on '{}' into {} elements",
        spec.kind(),
        template.id,
        instances.out.len()
    );
    instances.out
}

/// Accumulates the generated siblings of one looping element.
struct Instances<'t> {
    template: &'t ElementTemplate,
    config: &'t EngineConfig,
    next_y: f64,
    out: Vec<ResolvedElement>,
}

impl<'t> Instances<'t> {
    fn new(template: &'t ElementTemplate, config: &'t EngineConfig) -> Self {
        Self {
            template,
            config,
            next_y: template.rect.y,
            out: Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.out.len()
    }

    fn push(&mut self, suffix: impl Display, scope: &Scope<'_>) {
        let rect: Rect = self.template.rect.with_y(self.next_y);
        self.next_y = rect.next_y(self.config.stack_gap());

        let content = resolve_in(&self.template.content, scope, self.config.math_precision());
        let id = format!("{}_loop_{}", self.template.id, suffix);
        log::trace!("Loop instance '{}' at y={}", id, rect.y);
        self.out
            .push(ResolvedElement::from_template(self.template, id, rect, content));
    }

    fn truncated(&self, ceiling: usize, warnings: &mut Warnings) {
        let kind = match &self.template.repeat {
            Some(spec) => spec.kind(),
            None => return,
        };
        warnings.push(AssemblyWarning::LoopTruncated {
            element_id: self.template.id.clone(),
            kind,
            ceiling,
        });
    }
}

/// Counts `start..=end`. A non-positive step is treated as `1`.
fn expand_for(
    instances: &mut Instances<'_>,
    scope: &Scope<'_>,
    (start, end, step): (i64, i64, i64),
    warnings: &mut Warnings,
) {
    let step = if step <= 0 { 1 } else { step };
    let ceiling = instances.config.for_ceiling();

    let mut i = start;
    while i <= end {
        if instances.len() >= ceiling {
            instances.truncated(ceiling, warnings);
            return;
        }
        let local = scope.clone().with("i", i).with("index", i);
        instances.push(i, &local);
        match i.checked_add(step) {
            Some(next) => i = next,
            None => return,
        }
    }
}

/// Iterates the array at `data_source`. Object items expose their keys as
/// locals, alongside `item` and the 0-based `index`.
fn expand_foreach(
    instances: &mut Instances<'_>,
    scope: &Scope<'_>,
    data_source: &str,
    warnings: &mut Warnings,
) {
    let Some(Value::Array(items)) = scope.select(data_source.trim()) else {
        warnings.push(AssemblyWarning::ForeachSourceNotArray {
            element_id: instances.template.id.clone(),
            data_source: data_source.to_string(),
        });
        return;
    };

    let ceiling = instances.config.foreach_ceiling();
    for (index, item) in items.iter().enumerate() {
        if index >= ceiling {
            instances.truncated(ceiling, warnings);
            return;
        }
        let mut local = scope.clone();
        if let Value::Object(fields) = item {
            for (key, value) in fields {
                local.bind(key.clone(), value.clone());
            }
        }
        local.bind("item", item.clone());
        local.bind("index", index);
        instances.push(index, &local);
    }
}

/// Repeats while `condition` holds, checking it before every pass with the
/// 0-based `iteration` (and `index`) bound.
fn expand_while(
    instances: &mut Instances<'_>,
    scope: &Scope<'_>,
    condition: &Condition,
    warnings: &mut Warnings,
) {
    let ceiling = instances.config.while_ceiling();
    let mut iteration = 0usize;
    loop {
        let local = scope
            .clone()
            .with("iteration", iteration)
            .with("index", iteration);
        if !evaluate(condition, &local) {
            return;
        }
        if iteration >= ceiling {
            instances.truncated(ceiling, warnings);
            return;
        }
        instances.push(iteration, &local);
        iteration += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stencil_types::{OperatorKind, Rule};

    fn row(spec: LoopSpec) -> ElementTemplate {
        ElementTemplate::new("row", "text", Rect::new(40.0, 100.0, 200.0, 20.0)).with_loop(spec)
    }

    fn run(template: &ElementTemplate, dataset: &Dataset) -> (Vec<ResolvedElement>, Vec<AssemblyWarning>) {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut warnings = Warnings::new();
        let out = expand_with(template, &Scope::new(dataset), &EngineConfig::default(), &mut warnings);
        (out, warnings.into_vec())
    }

    #[test]
    fn test_for_is_inclusive_and_stacks() {
        let template = row(LoopSpec::For { start: 1, end: 3, step: 1 }).with_content("Row {i}/{index}: {math:i*10}");
        let out = expand(&template, &Dataset::new());

        let ids: Vec<_> = out.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["row_loop_1", "row_loop_2", "row_loop_3"]);
        let ys: Vec<_> = out.iter().map(|e| e.rect.y).collect();
        assert_eq!(ys, [100.0, 125.0, 150.0]);
        assert!(out.iter().all(|e| e.rect.x == 40.0 && e.rect.height == 20.0));
        assert_eq!(out[1].content, "Row 2/2: 20.00");
    }

    #[test]
    fn test_for_non_positive_step_and_empty_range() {
        let out = expand(&row(LoopSpec::For { start: 0, end: 2, step: 0 }), &Dataset::new());
        assert_eq!(out.len(), 3);
        let out = expand(&row(LoopSpec::For { start: 0, end: 4, step: -2 }), &Dataset::new());
        assert_eq!(out.len(), 5);
        let out = expand(&row(LoopSpec::For { start: 5, end: 1, step: 1 }), &Dataset::new());
        assert!(out.is_empty());
        let out = expand(&row(LoopSpec::For { start: 0, end: 10, step: 4 }), &Dataset::new());
        assert_eq!(out.last().map(|e| e.id.as_str()), Some("row_loop_8"));
    }

    #[test]
    fn test_for_ceiling() {
        let template = row(LoopSpec::For { start: 1, end: 1_000_000_000, step: 1 });
        let (out, warnings) = run(&template, &Dataset::new());
        assert_eq!(out.len(), 10_000);
        assert_eq!(
            warnings,
            [AssemblyWarning::LoopTruncated {
                element_id: "row".into(),
                kind: stencil_types::LoopKind::For,
                ceiling: 10_000
            }]
        );
    }

    #[test]
    fn test_for_near_integer_bounds() {
        let template = row(LoopSpec::For { start: i64::MAX - 1, end: i64::MAX, step: 5 });
        assert_eq!(expand(&template, &Dataset::new()).len(), 1);
    }

    #[test]
    fn test_foreach_binds_item_keys() {
        let dataset = Dataset::from_value(json!({
            "currency": "EUR",
            "order": { "lines": [
                { "name": "Pen", "qty": 2, "price": "1.5" },
                { "name": "Ink", "qty": 1, "price": 4 }
            ]}
        }));
        let template = row(LoopSpec::Foreach { data_source: "order.lines".into() })
            .with_content("#{index} {name} x{qty} = {math:qty*price} {currency}");
        let out = expand(&template, &dataset);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, "row_loop_0");
        assert_eq!(out[0].content, "#0 Pen x2 = 3.00 EUR");
        assert_eq!(out[1].content, "#1 Ink x1 = 4.00 EUR");
        assert_eq!(out[1].rect.y, 125.0);
    }

    #[test]
    fn test_foreach_scalars_and_non_arrays() {
        let dataset = Dataset::from_value(json!({ "tags": ["red", "blue"], "name": "x" }));
        let template = row(LoopSpec::Foreach { data_source: "tags".into() }).with_content("{item}");
        let contents: Vec<_> = expand(&template, &dataset).into_iter().map(|e| e.content).collect();
        assert_eq!(contents, ["red", "blue"]);

        let template = row(LoopSpec::Foreach { data_source: "name".into() });
        let (out, warnings) = run(&template, &dataset);
        assert!(out.is_empty());
        assert!(matches!(warnings.as_slice(), [AssemblyWarning::ForeachSourceNotArray { .. }]));

        let template = row(LoopSpec::Foreach { data_source: "missing".into() });
        assert!(expand(&template, &dataset).is_empty());
    }

    #[test]
    fn test_while_ceiling_is_exactly_one_hundred() {
        let template = row(LoopSpec::While { condition: Condition::always() }).with_content("{iteration}");
        let (out, warnings) = run(&template, &Dataset::new());
        assert_eq!(out.len(), 100);
        assert_eq!(out[99].content, "99");
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_while_stops_on_false() {
        let condition = Rule::new("iteration", OperatorKind::LessThan, json!("limit"));
        let template = row(LoopSpec::While {
            condition: Rule::new("iteration", OperatorKind::LessThan, 3).into(),
        });
        let (out, warnings) = run(&template, &Dataset::new());
        assert_eq!(out.len(), 3);
        assert!(warnings.is_empty());

        // A non-numeric bound never holds.
        let template = row(LoopSpec::While { condition: condition.into() });
        assert!(expand(&template, &Dataset::new()).is_empty());
    }

    #[test]
    fn test_unknown_loop_expands_to_nothing() {
        let template = row(LoopSpec::Unknown).with_content("never");
        let (out, warnings) = run(&template, &Dataset::new());
        assert!(out.is_empty());
        assert_eq!(
            warnings,
            [AssemblyWarning::UnknownLoop {
                element_id: "row".into()
            }]
        );
    }

    #[test]
    fn test_lowered_ceiling_applies() {
        let template = row(LoopSpec::For { start: 1, end: 50, step: 1 });
        let config = EngineConfig::new().with_for_ceiling(4).with_stack_gap(0.0);
        let mut warnings = Warnings::new();
        let out = expand_with(&template, &Scope::new(&Dataset::new()), &config, &mut warnings);
        assert_eq!(out.len(), 4);
        assert_eq!(out[3].rect.y, 160.0);
        assert!(!warnings.is_empty());
    }

    #[test]
    fn test_element_without_loop() {
        let dataset = Dataset::from_value(json!({ "name": "Ada" }));
        let template = ElementTemplate::new("title", "text", Rect::new(0.0, 0.0, 10.0, 10.0)).with_content("Hi {name}");
        let out = expand(&template, &dataset);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "title");
        assert_eq!(out[0].content, "Hi Ada");
    }
}
