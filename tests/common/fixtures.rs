use serde_json::{Value, json};

/// A small catalog: two sections of items with prices and flags.
pub fn catalog() -> Value {
    json!({
        "name": "catalog",
        "attributes": { "currency": "EUR" },
        "children": [
            {
                "name": "section",
                "attributes": { "id": "tools" },
                "children": [
                    { "name": "item", "attributes": { "id": "hammer", "price": 12.5, "stock": true } },
                    { "name": "item", "attributes": { "id": "saw", "price": 30, "stock": false } },
                    { "name": "note", "attributes": { "text": "Sharp edges" } }
                ]
            },
            {
                "name": "section",
                "attributes": { "id": "garden" },
                "children": [
                    { "name": "item", "attributes": { "id": "rake", "price": 8, "stock": true } },
                    {
                        "name": "item",
                        "attributes": { "id": "hose", "price": 22 },
                        "children": [ { "name": "item", "attributes": { "id": "nozzle", "price": 3 } } ]
                    }
                ]
            }
        ]
    })
}

/// A root with `count` flat items whose prices cycle through 0..100.
pub fn flat_items(count: usize) -> Value {
    let children: Vec<Value> = (0..count)
        .map(|i| json!({ "name": "item", "attributes": { "id": format!("i{}", i), "price": i % 100 } }))
        .collect();
    json!({ "name": "root", "children": children })
}
