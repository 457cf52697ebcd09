pub mod fixtures;

use serde_json::Value;
use stencil::{Document, Engine, ResolvedElement, StencilError};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Initialise logging once per test binary; repeated calls are ignored.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Assemble a JSON template against JSON data with the default engine.
pub fn render(template: &Value, data: Value) -> Result<Document, StencilError> {
    render_with(&Engine::new(), template, data)
}

pub fn render_with(engine: &Engine, template: &Value, data: Value) -> Result<Document, StencilError> {
    init_logging();
    let template = serde_json::to_string(template)?;
    let data = serde_json::to_string(&data)?;
    engine.assemble_json(&template, &data)
}

/// Wraps element definitions in a single-page template.
pub fn single_page(elements: Value) -> Value {
    serde_json::json!({ "pages": [ { "id": "page-1", "elements": elements } ] })
}

/// The elements of the first page.
pub fn first_page(document: &Document) -> &[ResolvedElement] {
    document
        .pages
        .first()
        .map(|page| page.elements.as_slice())
        .unwrap_or_default()
}

pub fn ids(document: &Document) -> Vec<&str> {
    document.elements().map(|e| e.id.as_str()).collect()
}

pub fn contents(document: &Document) -> Vec<&str> {
    document.elements().map(|e| e.content.as_str()).collect()
}
