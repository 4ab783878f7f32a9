// Search-parameter criteria builders.
//
// Each optional parameter contributes one clause; absent and empty-string
// parameters contribute nothing, so clauses only ever narrow the result.
// Name-like fields get a case-insensitive unanchored substring match;
// comma-separated parameters become a $in set with one pattern per token.

use serde_json::{json, Map, Value};

/// GET /employee criteria: `name` substring match, `supervisor` as an
/// exact-name set on the embedded summary.
pub fn employee_criteria(name: Option<&str>, supervisor: Option<&str>) -> Value {
    let mut criteria = Map::new();
    if let Some(supervisor) = present(supervisor) {
        criteria.insert(
            "supervisor.name".to_string(),
            json!({"$in": split_values(supervisor)}),
        );
    }
    if let Some(name) = present(name) {
        criteria.insert("name".to_string(), contains_ci(name));
    }
    Value::Object(criteria)
}

/// GET /supervisor criteria: `name` substring match, `review_report` as a
/// set of substring patterns over subordinate names.
pub fn supervisor_criteria(name: Option<&str>, review_report: Option<&str>) -> Value {
    let mut criteria = Map::new();
    if let Some(review_report) = present(review_report) {
        criteria.insert(
            "review_report.name".to_string(),
            json!({"$in": split_patterns(review_report)}),
        );
    }
    if let Some(name) = present(name) {
        criteria.insert("name".to_string(), contains_ci(name));
    }
    Value::Object(criteria)
}

/// GET /taskforce criteria: `members` as a set of substring patterns over
/// member names.
pub fn taskforce_criteria(members: Option<&str>) -> Value {
    let mut criteria = Map::new();
    if let Some(members) = present(members) {
        criteria.insert(
            "members.name".to_string(),
            json!({"$in": split_patterns(members)}),
        );
    }
    Value::Object(criteria)
}

/// Empty string counts as absent, exactly like the falsy check it mirrors.
fn present(param: Option<&str>) -> Option<&str> {
    param.filter(|s| !s.is_empty())
}

fn contains_ci(needle: &str) -> Value {
    json!({"$regex": needle, "$options": "i"})
}

fn split_values(list: &str) -> Vec<Value> {
    list.split(',').map(|token| json!(token)).collect()
}

fn split_patterns(list: &str) -> Vec<Value> {
    list.split(',').map(contains_ci).collect()
}
