//! JSON fixtures shared by the integration tests.
use serde_json::{Value, json};

/// A two-page invoice: a header, a line-item loop, a conditional overdue
/// notice, a totals line and a signature page.
pub fn invoice_template() -> Value {
    json!({
        "name": "invoice",
        "pages": [
            {
                "id": "p1",
                "elements": [
                    {
                        "id": "title", "type": "text", "pageId": "p1",
                        "x": 40, "y": 40, "width": 300, "height": 30,
                        "content": "Invoice {invoice.number} for {customer.name}",
                        "styles": { "font-size": "18px", "font-weight": "bold" }
                    },
                    {
                        "id": "line", "type": "text", "pageId": "p1",
                        "x": 40, "y": "100", "width": 400, "height": "20",
                        "content": "{index}. {description}: {qty} x {price} = {math:qty*price}",
                        "loop": { "type": "foreach", "dataSource": "items" }
                    },
                    {
                        "id": "overdue", "type": "text", "pageId": "p1",
                        "x": 40, "y": 300, "width": 400, "height": 20,
                        "content": "OVERDUE since {due_date}",
                        "styles": { "color": "#c00" },
                        "conditions": {
                            "logic": "and",
                            "rules": [
                                { "field": "status", "operator": "=", "value": "OVERDUE" },
                                { "field": "balance", "operator": ">", "value": "0" }
                            ]
                        }
                    },
                    {
                        "id": "total", "type": "text", "pageId": "p1",
                        "x": 40, "y": 330, "width": 400, "height": 20,
                        "content": "Total: {math:subtotal + shipping} {if:currency=EUR}EUR{/if}{if:currency=USD}USD{/if}"
                    }
                ]
            },
            {
                "id": "p2",
                "elements": [
                    {
                        "id": "sign", "type": "text",
                        "x": 40, "y": 700, "width": 200, "height": 20,
                        "content": "Signed {date}",
                        "conditions": { "field": "signed", "operator": "not_empty" }
                    },
                    {
                        "id": "stamp", "type": "image",
                        "x": 300, "y": 700, "width": 80, "height": 80,
                        "content": "{stamp_url}",
                        "conditions": {
                            "logic": "or",
                            "rules": [
                                { "field": "tags", "operator": "in", "value": "vip,partner" },
                                { "field": "customer.name", "operator": "starts_with", "value": "acme" }
                            ]
                        }
                    }
                ]
            }
        ]
    })
}

pub fn invoice_data() -> Value {
    json!({
        "invoice": { "number": "2024-017" },
        "customer": { "name": "ACME Corp" },
        "status": "overdue",
        "balance": "150.00",
        "due_date": "2024-02-01",
        "currency": "EUR",
        "subtotal": "95.5",
        "shipping": 4.5,
        "items": [
            { "description": "Widget", "qty": "2", "price": "10" },
            { "description": "Gadget", "qty": 1, "price": 75.5 }
        ],
        "signed": "",
        "tags": ["regular"],
        "stamp_url": "https://example.com/stamp.png"
    })
}
