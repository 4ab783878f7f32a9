// Inclusion projections. `_id` is always carried; a dotted inclusion into
// an array of sub-documents keeps the array and strips every sub-field
// that was not named.

use serde_json::{Map, Value};

pub fn project(doc: &Value, projection: &Value) -> Value {
    let (Value::Object(source), Value::Object(fields)) = (doc, projection) else {
        return doc.clone();
    };

    let mut out = Map::new();
    if let Some(id) = source.get("_id") {
        out.insert("_id".to_string(), id.clone());
    }
    for (path, flag) in fields {
        if is_included(flag) {
            let segments: Vec<&str> = path.split('.').collect();
            include_path(source, &mut out, &segments);
        }
    }
    Value::Object(out)
}

fn is_included(flag: &Value) -> bool {
    match flag {
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Bool(b) => *b,
        _ => false,
    }
}

fn include_path(source: &Map<String, Value>, out: &mut Map<String, Value>, segments: &[&str]) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };
    let Some(value) = source.get(*head) else {
        return;
    };

    if rest.is_empty() {
        out.insert((*head).to_string(), value.clone());
        return;
    }

    match value {
        Value::Object(inner) => {
            let entry = out
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(dst) = entry {
                include_path(inner, dst, rest);
            }
        }
        Value::Array(items) => {
            // Sibling inclusions into the same array must land in the same
            // output elements, so the skeleton is built once and merged into
            let entry = out.entry((*head).to_string()).or_insert_with(|| {
                Value::Array(
                    items
                        .iter()
                        .map(|item| {
                            if item.is_object() {
                                Value::Object(Map::new())
                            } else {
                                item.clone()
                            }
                        })
                        .collect(),
                )
            });
            if let Value::Array(dst_items) = entry {
                for (item, dst) in items.iter().zip(dst_items.iter_mut()) {
                    if let (Value::Object(src_inner), Value::Object(dst_inner)) = (item, dst) {
                        include_path(src_inner, dst_inner, rest);
                    }
                }
            }
        }
        _ => {}
    }
}
