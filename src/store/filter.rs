// Criteria evaluation over JSON documents.
//
// Criteria are conjunctions of per-path conditions. Dotted paths traverse
// nested objects and fan out across arrays: "members.name" collects the
// `name` of every element of a `members` array, and the condition holds
// if any collected value satisfies it.

use regex::RegexBuilder;
use serde_json::Value;

use super::StoreError;

/// Does `doc` satisfy `criteria`? An empty criteria object matches all.
pub fn matches(doc: &Value, criteria: &Value) -> Result<bool, StoreError> {
    let Value::Object(conditions) = criteria else {
        return Err(StoreError::InvalidCriteria(
            "criteria must be a JSON object".to_string(),
        ));
    };

    for (path, condition) in conditions {
        let mut candidates = Vec::new();
        collect_path(doc, path, &mut candidates);
        if !condition_matches(&candidates, condition)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Resolve the positional (`array.$`) target for an update: the index of
/// the first element of the array at `array_path` that satisfies the
/// array-element conditions contained in `criteria`. This is the store's
/// contract for positional updates: "$" refers to the element the query
/// matched.
pub fn positional_index(
    doc: &Value,
    criteria: &Value,
    array_path: &str,
) -> Result<Option<usize>, StoreError> {
    let Value::Object(conditions) = criteria else {
        return Err(StoreError::InvalidCriteria(
            "criteria must be a JSON object".to_string(),
        ));
    };

    // Sub-conditions scoped to elements of the target array, either via
    // dotted paths ("review_report.employee_id") or $elemMatch.
    let prefix = format!("{}.", array_path);
    let mut element_conditions: Vec<(&str, &Value)> = Vec::new();
    for (path, condition) in conditions {
        if let Some(subfield) = path.strip_prefix(&prefix) {
            element_conditions.push((subfield, condition));
        } else if path == array_path {
            if let Some(sub) = condition.get("$elemMatch") {
                if let Value::Object(sub_conditions) = sub {
                    for (k, v) in sub_conditions {
                        element_conditions.push((k.as_str(), v));
                    }
                }
            }
        }
    }

    let Some(Value::Array(elements)) = get_path(doc, array_path) else {
        return Ok(None);
    };

    'element: for (index, element) in elements.iter().enumerate() {
        for (subfield, condition) in &element_conditions {
            let mut candidates = Vec::new();
            collect_path(element, subfield, &mut candidates);
            if !condition_matches(&candidates, condition)? {
                continue 'element;
            }
        }
        return Ok(Some(index));
    }
    Ok(None)
}

fn condition_matches(candidates: &[&Value], condition: &Value) -> Result<bool, StoreError> {
    if let Value::Object(fields) = condition {
        if fields.keys().any(|k| k.starts_with('$')) {
            return operator_matches(candidates, fields);
        }
    }
    // Implicit equality; a candidate that is itself an array also matches
    // when it contains the value
    Ok(candidates.iter().any(|v| {
        *v == condition
            || matches!(v, Value::Array(items) if items.iter().any(|item| item == condition))
    }))
}

fn operator_matches(
    candidates: &[&Value],
    fields: &serde_json::Map<String, Value>,
) -> Result<bool, StoreError> {
    for (op, operand) in fields {
        let holds = match op.as_str() {
            "$regex" => {
                let case_insensitive = fields
                    .get("$options")
                    .and_then(Value::as_str)
                    .map(|o| o.contains('i'))
                    .unwrap_or(false);
                regex_matches(candidates, operand, case_insensitive)?
            }
            "$options" => continue, // consumed by $regex
            "$in" => {
                let Value::Array(members) = operand else {
                    return Err(StoreError::InvalidCriteria(
                        "$in requires an array".to_string(),
                    ));
                };
                let mut any = false;
                for member in members {
                    if condition_matches(candidates, member)? {
                        any = true;
                        break;
                    }
                }
                any
            }
            "$elemMatch" => {
                let mut any = false;
                for candidate in candidates {
                    if let Value::Array(elements) = candidate {
                        for element in elements {
                            if matches(element, operand)? {
                                any = true;
                                break;
                            }
                        }
                    }
                }
                any
            }
            other => {
                return Err(StoreError::InvalidCriteria(format!(
                    "unsupported operator: {}",
                    other
                )))
            }
        };
        if !holds {
            return Ok(false);
        }
    }
    Ok(true)
}

fn regex_matches(
    candidates: &[&Value],
    pattern: &Value,
    case_insensitive: bool,
) -> Result<bool, StoreError> {
    let Value::String(pattern) = pattern else {
        return Err(StoreError::InvalidCriteria(
            "$regex requires a string pattern".to_string(),
        ));
    };
    let re = RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|e| StoreError::InvalidRegex(e.to_string()))?;
    Ok(candidates
        .iter()
        .any(|v| matches!(v, Value::String(s) if re.is_match(s))))
}

/// Collect every value reachable from `doc` via the dotted `path`,
/// fanning out across intermediate arrays.
pub fn collect_path<'a>(doc: &'a Value, path: &str, out: &mut Vec<&'a Value>) {
    collect_segments(doc, &path.split('.').collect::<Vec<_>>(), out);
}

fn collect_segments<'a>(value: &'a Value, segments: &[&str], out: &mut Vec<&'a Value>) {
    let Some((head, rest)) = segments.split_first() else {
        out.push(value);
        return;
    };
    match value {
        Value::Object(map) => {
            if let Some(next) = map.get(*head) {
                collect_segments(next, rest, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_segments(item, segments, out);
            }
        }
        _ => {}
    }
}

/// Resolve a dotted path through nested objects only (no array fan-out).
pub fn get_path<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = doc;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_criteria_matches_all() {
        let doc = json!({"name": "Jon Tan"});
        assert!(matches(&doc, &json!({})).unwrap());
    }

    #[test]
    fn test_regex_is_case_insensitive_substring() {
        let doc = json!({"name": "Jon Tan"});
        let criteria = json!({"name": {"$regex": "jon", "$options": "i"}});
        assert!(matches(&doc, &criteria).unwrap());

        let criteria = json!({"name": {"$regex": "jon"}});
        assert!(!matches(&doc, &criteria).unwrap());
    }

    #[test]
    fn test_dotted_path_fans_out_across_arrays() {
        let doc = json!({"members": [
            {"name": "Alex", "role": "lead"},
            {"name": "Jon", "role": "member"},
        ]});
        let criteria = json!({"members.name": {"$in": [{"$regex": "alex", "$options": "i"}]}});
        assert!(matches(&doc, &criteria).unwrap());

        let criteria = json!({"members.name": {"$in": [{"$regex": "sam", "$options": "i"}]}});
        assert!(!matches(&doc, &criteria).unwrap());
    }

    #[test]
    fn test_in_with_plain_values_uses_equality() {
        let doc = json!({"supervisor": {"name": "Jon Tan"}});
        assert!(matches(&doc, &json!({"supervisor.name": {"$in": ["Jon Tan", "Alex"]}})).unwrap());
        assert!(!matches(&doc, &json!({"supervisor.name": {"$in": ["jon tan"]}})).unwrap());
    }

    #[test]
    fn test_elem_match() {
        let doc = json!({"review_report": [
            {"employee_id": 5, "name": "Alex", "rank": 2},
            {"employee_id": 7, "name": "Sam", "rank": 1},
        ]});
        let criteria = json!({"review_report": {"$elemMatch": {"employee_id": 7}}});
        assert!(matches(&doc, &criteria).unwrap());
        let criteria = json!({"review_report": {"$elemMatch": {"employee_id": 9}}});
        assert!(!matches(&doc, &criteria).unwrap());
    }

    #[test]
    fn test_positional_index_resolves_first_matching_element() {
        let doc = json!({
            "name": "Jon Tan",
            "review_report": [
                {"employee_id": 5, "name": "Alex", "rank": 2},
                {"employee_id": 7, "name": "Sam", "rank": 1},
            ]
        });
        let criteria = json!({"name": "Jon Tan", "review_report.employee_id": 7});
        assert_eq!(positional_index(&doc, &criteria, "review_report").unwrap(), Some(1));

        let criteria = json!({"name": "Jon Tan", "review_report.employee_id": 9});
        assert_eq!(positional_index(&doc, &criteria, "review_report").unwrap(), None);
    }

    #[test]
    fn test_unknown_operator_is_rejected() {
        let doc = json!({"a": 1});
        assert!(matches(&doc, &json!({"a": {"$near": 1}})).is_err());
    }
}
