mod common;

use common::fixtures::{invoice_data, invoice_template};
use common::{TestResult, contents, first_page, ids, render, render_with, single_page};
use serde_json::json;
use stencil::{Dataset, Engine, Template};

#[test]
fn test_quantity_times_price_scenario() -> TestResult {
    let template = single_page(json!([
        { "id": "e1", "type": "text", "x": 0, "y": 0, "width": 100, "height": 10,
          "content": "Qty {q} = {math:q*price}" }
    ]));
    let document = render(&template, json!({ "q": "3", "price": "10" }))?;

    assert_eq!(document.pages.len(), 1);
    assert_eq!(first_page(&document).len(), 1);
    assert_eq!(first_page(&document)[0].content, "Qty 3 = 30.00");
    Ok(())
}

#[test]
fn test_invoice_document() -> TestResult {
    let document = render(&invoice_template(), invoice_data())?;

    assert_eq!(
        ids(&document),
        ["title", "line_loop_0", "line_loop_1", "overdue", "total", "stamp"]
    );
    assert_eq!(
        contents(&document),
        [
            "Invoice 2024-017 for ACME Corp",
            "0. Widget: 2 x 10 = 20.00",
            "1. Gadget: 1 x 75.5 = 75.50",
            "OVERDUE since 2024-02-01",
            "Total: 100.00 EUR",
            "https://example.com/stamp.png",
        ]
    );

    let lines: Vec<_> = first_page(&document)[1..3].iter().map(|e| (e.rect.x, e.rect.y)).collect();
    assert_eq!(lines, [(40.0, 100.0), (40.0, 125.0)]);

    let stamp = document.element("stamp").ok_or("stamp missing")?;
    assert_eq!(stamp.page_id, "p2");
    assert_eq!(stamp.kind, "image");
    Ok(())
}

#[test]
fn test_hidden_elements_take_no_space() -> TestResult {
    let mut data = invoice_data();
    data["status"] = json!("paid");
    data["currency"] = json!("USD");
    data["tags"] = json!(["partner"]);
    data["customer"]["name"] = json!("Initech");

    let document = render(&invoice_template(), data)?;
    assert!(document.element("overdue").is_none());
    assert_eq!(document.element("total").map(|e| e.content.as_str()), Some("Total: 100.00 USD"));
    // Visibility never moves the remaining elements.
    assert_eq!(document.element("total").map(|e| e.rect.y), Some(330.0));
    assert!(document.element("stamp").is_some());
    Ok(())
}

#[test]
fn test_output_shape() -> TestResult {
    let document = render(&invoice_template(), invoice_data())?;
    let value = serde_json::to_value(&document)?;

    let title = &value["pages"][0]["elements"][0];
    assert_eq!(title["id"], "title");
    assert_eq!(title["type"], "text");
    assert_eq!(title["pageId"], "p1");
    assert_eq!(title["x"], 40.0);
    assert_eq!(title["styles"]["font-weight"], "bold");
    assert!(title.get("conditions").is_none());
    assert!(title.get("loop").is_none());

    let overdue = &value["pages"][0]["elements"][3];
    assert_eq!(overdue["id"], "overdue");
    assert!(overdue.get("conditions").is_none());
    assert_eq!(value["pages"][1]["id"], "p2");
    Ok(())
}

#[test]
fn test_batch_preserves_input_order() -> TestResult {
    let template: Template = serde_json::from_value(single_page(json!([
        { "id": "n", "type": "text", "content": "#{n}: {math:n*n}" }
    ])))?;
    let datasets: Vec<Dataset> = (0..64).map(|n| Dataset::from_value(json!({ "n": n }))).collect();

    for engine in [Engine::new(), Engine::builder().sequential().build()] {
        let documents = engine.assemble_batch(&template, datasets.clone());
        assert_eq!(documents.len(), 64);
        for (n, document) in documents.iter().enumerate() {
            assert_eq!(contents(document), [format!("#{}: {}.00", n, n * n).as_str()]);
        }
    }
    Ok(())
}

#[test]
fn test_engine_settings_flow_into_assembly() -> TestResult {
    let template = single_page(json!([
        { "id": "r", "type": "text", "y": 10, "height": 10,
          "content": "{math:i/3}",
          "loop": { "type": "for", "start": 1, "end": 1000, "step": 1 } }
    ]));
    let engine = Engine::builder()
        .with_for_ceiling(3)
        .with_stack_gap(0.0)
        .with_math_precision(3)
        .build();

    let document = render_with(&engine, &template, json!({}))?;
    assert_eq!(contents(&document), ["0.333", "0.667", "1.000"]);
    let ys: Vec<_> = document.elements().map(|e| e.rect.y).collect();
    assert_eq!(ys, [10.0, 20.0, 30.0]);
    Ok(())
}

#[test]
fn test_malformed_content_never_fails() -> TestResult {
    let template = single_page(json!([
        { "id": "a", "type": "text",
          "content": "{math:2+*3} {math:((((1} {if:x} {{{ }}} {unknown.path[9]} {math:" },
        { "id": "b", "type": "text", "content": "{if:x=1}never closed" }
    ]));
    let document = render(&template, json!({ "x": 1 }))?;
    assert_eq!(
        contents(&document),
        [
            "0.00 0.00 {if:x} {{{ }}}  {math:",
            "{if:x=1}never closed"
        ]
    );
    Ok(())
}
