// Update application: $set (including the positional `array.$` segment)
// and $push. The matching criteria are threaded through so the positional
// segment can resolve to the element the query matched.

use serde_json::{Map, Value};

use super::filter::positional_index;
use super::StoreError;

/// Apply `update` to `doc` in place. Returns whether the document changed.
pub fn apply_update(doc: &mut Value, criteria: &Value, update: &Value) -> Result<bool, StoreError> {
    let Value::Object(operations) = update else {
        return Err(StoreError::InvalidUpdate(
            "update must be a JSON object".to_string(),
        ));
    };

    let before = doc.clone();
    for (operator, fields) in operations {
        let Value::Object(fields) = fields else {
            return Err(StoreError::InvalidUpdate(format!(
                "{} requires an object",
                operator
            )));
        };
        match operator.as_str() {
            "$set" => {
                for (path, value) in fields {
                    apply_set(doc, criteria, path, value.clone())?;
                }
            }
            "$push" => {
                for (path, value) in fields {
                    apply_push(doc, path, value.clone())?;
                }
            }
            other => {
                return Err(StoreError::InvalidUpdate(format!(
                    "unsupported update operator: {}",
                    other
                )))
            }
        }
    }
    Ok(*doc != before)
}

fn apply_set(
    doc: &mut Value,
    criteria: &Value,
    path: &str,
    value: Value,
) -> Result<(), StoreError> {
    // Positional form: "array.$" or "array.$.subfield"
    if let Some((array_path, remainder)) = split_positional(path) {
        let Some(index) = positional_index(doc, criteria, array_path)? else {
            return Err(StoreError::InvalidUpdate(format!(
                "positional operator found no matched element for {}",
                array_path
            )));
        };
        let Some(Value::Array(elements)) = get_path_mut(doc, array_path) else {
            return Err(StoreError::InvalidUpdate(format!(
                "{} is not an array",
                array_path
            )));
        };
        let element = &mut elements[index];
        match remainder {
            None => *element = value,
            Some(subfield) => set_path(element, subfield, value),
        }
        return Ok(());
    }

    set_path(doc, path, value);
    Ok(())
}

fn apply_push(doc: &mut Value, path: &str, value: Value) -> Result<(), StoreError> {
    // $push creates the array when the field is missing
    let target = ensure_path(doc, path);
    match target {
        Value::Array(items) => {
            items.push(value);
            Ok(())
        }
        Value::Null => {
            *target = Value::Array(vec![value]);
            Ok(())
        }
        _ => Err(StoreError::InvalidUpdate(format!(
            "$push target {} is not an array",
            path
        ))),
    }
}

fn split_positional(path: &str) -> Option<(&str, Option<&str>)> {
    if let Some(array_path) = path.strip_suffix(".$") {
        return Some((array_path, None));
    }
    path.split_once(".$.")
        .map(|(array_path, subfield)| (array_path, Some(subfield)))
}

/// Set a dotted path, creating intermediate objects as needed.
fn set_path(doc: &mut Value, path: &str, value: Value) {
    *ensure_path(doc, path) = value;
}

fn ensure_path<'a>(doc: &'a mut Value, path: &str) -> &'a mut Value {
    let mut current = doc;
    for segment in path.split('.') {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        current = current
            .as_object_mut()
            .expect("just ensured object")
            .entry(segment.to_string())
            .or_insert(Value::Null);
    }
    current
}

fn get_path_mut<'a>(doc: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    let mut current = doc;
    for segment in path.split('.') {
        current = current.as_object_mut()?.get_mut(segment)?;
    }
    Some(current)
}
