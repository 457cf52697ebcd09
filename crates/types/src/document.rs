//! The resolved output handed to a rendering backend.
use crate::element::ElementTemplate;
use crate::geometry::Rect;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A concrete, positioned element with fully substituted content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedElement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "pageId")]
    pub page_id: String,
    #[serde(flatten)]
    pub rect: Rect,
    pub content: String,
    #[serde(default)]
    pub styles: BTreeMap<String, String>,
}

impl ResolvedElement {
    /// Instantiates a template with the given id, geometry and final content.
    pub fn from_template(
        template: &ElementTemplate,
        id: impl Into<String>,
        rect: Rect,
        content: String,
    ) -> Self {
        Self {
            id: id.into(),
            kind: template.kind.clone(),
            page_id: template.page_id.clone(),
            rect,
            content,
            styles: template.styles.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPage {
    pub id: String,
    pub elements: Vec<ResolvedElement>,
}

/// The fully resolved page/element tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub pages: Vec<ResolvedPage>,
}

impl Document {
    pub fn page(&self, id: &str) -> Option<&ResolvedPage> {
        self.pages.iter().find(|p| p.id == id)
    }

    /// All elements across all pages, in page order then stacking order.
    pub fn elements(&self) -> impl Iterator<Item = &ResolvedElement> {
        self.pages.iter().flat_map(|p| p.elements.iter())
    }

    pub fn element(&self, id: &str) -> Option<&ResolvedElement> {
        self.elements().find(|e| e.id == id)
    }

    pub fn element_count(&self) -> usize {
        self.pages.iter().map(|p| p.elements.len()).sum()
    }
}
