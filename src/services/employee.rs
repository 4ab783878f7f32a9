// Employee write coordinator.
//
// Creates or replaces an employee document together with its dependent
// contact and supervisor documents. There is no transactional envelope:
// each step commits on its own, and a failure partway leaves the earlier
// writes in place. The orderings below are observable contract.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::store::{DocumentStore, StoreError};

pub const EMPLOYEE: &str = "employee";
pub const SUPERVISOR: &str = "supervisor";
pub const CONTACT: &str = "contact";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct EmployeePayload {
    #[serde(default)]
    pub employee_id: Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub date_joined: Option<String>,
    #[serde(default)]
    pub contact: Option<ContactPayload>,
    #[serde(default)]
    pub supervisor: Option<SupervisorRef>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ContactPayload {
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub address3: Option<String>,
    pub mobile_phone: Option<String>,
    pub home_phone: Option<String>,
    pub office_phone: Option<String>,
    pub office_did: Option<String>,
    pub personal_email: Option<String>,
    pub company_email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupervisorRef {
    pub name: String,
    #[serde(default)]
    pub employee_id: Value,
    #[serde(default)]
    pub rank: Value,
}

/// How a subordinate's entry landed in the supervisor's review_report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// An existing entry for this employee_id was replaced positionally.
    ReplacedInPlace,
    /// The supervisor existed but had no entry; one was appended.
    Appended,
    /// No supervisor by that name; a new document was created.
    Created,
}

/// Coerce a client-supplied employee_id (integer or integer string);
/// fractional numbers and anything non-numeric are absent. Identifiers are
/// whole numbers, so a fractional value is a client error, never truncated.
pub fn coerce_employee_id(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// The partial contact copy embedded in the employee document.
pub fn contact_summary(contact_id: &str, contact: &ContactPayload) -> Value {
    json!({
        "_id": contact_id,
        "office_phone": contact.office_phone,
        "office_did": contact.office_did,
        "company_email": contact.company_email,
    })
}

/// The denormalized back-reference embedded in the employee document:
/// the supervisor's own employee_id and name, nothing else.
pub fn supervisor_summary(reference: &SupervisorRef) -> Value {
    json!({
        "employee_id": coerce_employee_id(&reference.employee_id),
        "name": reference.name,
    })
}

fn contact_document(contact: &ContactPayload) -> Value {
    json!({
        "address1": contact.address1,
        "address2": contact.address2,
        "address3": contact.address3,
        "mobile_phone": contact.mobile_phone,
        "home_phone": contact.home_phone,
        "office_phone": contact.office_phone,
        "office_did": contact.office_did,
        "personal_email": contact.personal_email,
        "company_email": contact.company_email,
    })
}

fn validate(payload: &EmployeePayload) -> Result<(i64, String), ServiceError> {
    let name = payload
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .map(str::to_string);
    // 0 fails the check, matching the truthiness the API was born with
    let employee_id = coerce_employee_id(&payload.employee_id).filter(|id| *id != 0);
    match (name, employee_id) {
        (Some(name), Some(employee_id)) => Ok((employee_id, name)),
        _ => Err(ServiceError::Validation(
            "Missing fields required".to_string(),
        )),
    }
}

/// Put `{employee_id, name, rank}` into the named supervisor's
/// review_report, keeping at most one entry per subordinate.
///
/// The store's upsert cannot target one array element conditionally, so
/// this runs a three-tier fallback, each tier driven by the previous
/// tier's matched count:
///   1. positional replace of an existing entry for this employee_id,
///   2. append to the named supervisor's list,
///   3. insert a new supervisor document seeded with a one-element list.
pub async fn sync_supervisor(
    store: &dyn DocumentStore,
    reference: &SupervisorRef,
    employee_id: i64,
    employee_name: &str,
) -> Result<SyncOutcome, ServiceError> {
    let entry = json!({
        "employee_id": employee_id,
        "name": employee_name,
        "rank": reference.rank,
    });

    let replaced = store
        .update_one(
            SUPERVISOR,
            &json!({"name": reference.name, "review_report.employee_id": employee_id}),
            &json!({"$set": {"review_report.$": entry}}),
        )
        .await?;
    if replaced.matched > 0 {
        return Ok(SyncOutcome::ReplacedInPlace);
    }

    let appended = store
        .update_one(
            SUPERVISOR,
            &json!({"name": reference.name}),
            &json!({"$push": {"review_report": entry}}),
        )
        .await?;
    if appended.matched > 0 {
        return Ok(SyncOutcome::Appended);
    }

    store
        .insert_one(
            SUPERVISOR,
            json!({"name": reference.name, "review_report": [entry]}),
        )
        .await?;
    Ok(SyncOutcome::Created)
}

/// Create path: validate, sync the supervisor, insert a fresh contact,
/// then insert the assembled employee document. Returns the employee `_id`.
pub async fn create_employee(
    store: &dyn DocumentStore,
    payload: EmployeePayload,
) -> Result<String, ServiceError> {
    let (employee_id, name) = validate(&payload)?;

    let supervisor_field = match &payload.supervisor {
        None => Value::Null,
        Some(reference) => {
            sync_supervisor(store, reference, employee_id, &name).await?;
            supervisor_summary(reference)
        }
    };

    let contact = payload.contact.clone().unwrap_or_default();
    let contact_id = store.insert_one(CONTACT, contact_document(&contact)).await?;

    let employee = json!({
        "employee_id": employee_id,
        "name": name,
        "designation": payload.designation,
        "department": payload.department,
        "date_joined": payload.date_joined,
        "contact": contact_summary(&contact_id, &contact),
        "supervisor": supervisor_field,
    });
    Ok(store.insert_one(EMPLOYEE, employee).await?)
}

/// Update path: the same supervisor chain, then a full in-place replace of
/// the contact and the employee by their identifiers. A miss on either
/// identifier aborts with NotFound, after the earlier writes committed.
pub async fn update_employee(
    store: &dyn DocumentStore,
    id: &str,
    contact_id: &str,
    payload: EmployeePayload,
) -> Result<(), ServiceError> {
    let (employee_id, name) = validate(&payload)?;

    let supervisor_field = match &payload.supervisor {
        None => Value::Null,
        Some(reference) => {
            sync_supervisor(store, reference, employee_id, &name).await?;
            supervisor_summary(reference)
        }
    };

    let contact = payload.contact.clone().unwrap_or_default();
    let replaced = store
        .update_one(
            CONTACT,
            &json!({"_id": contact_id}),
            &json!({"$set": contact_document(&contact)}),
        )
        .await?;
    if replaced.matched == 0 {
        return Err(ServiceError::NotFound("Contact not found".to_string()));
    }

    let employee = json!({
        "employee_id": employee_id,
        "name": name,
        "designation": payload.designation,
        "department": payload.department,
        "date_joined": payload.date_joined,
        "contact": contact_summary(contact_id, &contact),
        "supervisor": supervisor_field,
    });
    let replaced = store
        .update_one(EMPLOYEE, &json!({"_id": id}), &json!({"$set": employee}))
        .await?;
    if replaced.matched == 0 {
        return Err(ServiceError::NotFound("Employee not found".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::{json, Value};

    fn payload(employee_id: i64, name: &str, supervisor: Option<SupervisorRef>) -> EmployeePayload {
        EmployeePayload {
            employee_id: json!(employee_id),
            name: Some(name.to_string()),
            designation: Some("Engineer".to_string()),
            department: Some("Platform".to_string()),
            date_joined: Some("2024-01-15".to_string()),
            contact: Some(ContactPayload {
                office_phone: Some("6555 0001".to_string()),
                office_did: Some("101".to_string()),
                company_email: Some("jon@company.xyz".to_string()),
                mobile_phone: Some("9111 0001".to_string()),
                ..Default::default()
            }),
            supervisor,
        }
    }

    fn supervisor_ref(name: &str) -> SupervisorRef {
        SupervisorRef {
            name: name.to_string(),
            employee_id: json!(1),
            rank: json!(2),
        }
    }

    #[tokio::test]
    async fn test_missing_name_or_id_writes_nothing() {
        let store = MemoryStore::new();

        let mut no_name = payload(5, "x", Some(supervisor_ref("Jon Tan")));
        no_name.name = None;
        let err = create_employee(&store, no_name).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let zero_id = payload(0, "Alex", Some(supervisor_ref("Jon Tan")));
        let err = create_employee(&store, zero_id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        assert_eq!(store.count(EMPLOYEE), 0);
        assert_eq!(store.count(SUPERVISOR), 0);
        assert_eq!(store.count(CONTACT), 0);
    }

    #[tokio::test]
    async fn test_sync_tiers_create_append_then_replace_in_place() {
        let store = MemoryStore::new();

        // Unknown supervisor name: a new document with a one-element list
        let outcome = sync_supervisor(&store, &supervisor_ref("Jon Tan"), 5, "Alex")
            .await
            .unwrap();
        assert_eq!(outcome, SyncOutcome::Created);
        assert_eq!(store.count(SUPERVISOR), 1);

        // Second subordinate appends
        let outcome = sync_supervisor(&store, &supervisor_ref("Jon Tan"), 7, "Sam")
            .await
            .unwrap();
        assert_eq!(outcome, SyncOutcome::Appended);

        // Same subordinate again replaces its entry, never duplicates
        let outcome = sync_supervisor(&store, &supervisor_ref("Jon Tan"), 5, "Alexandra")
            .await
            .unwrap();
        assert_eq!(outcome, SyncOutcome::ReplacedInPlace);

        let doc = store
            .find_one(SUPERVISOR, &json!({"name": "Jon Tan"}))
            .await
            .unwrap()
            .expect("supervisor");
        let report = doc["review_report"].as_array().unwrap();
        assert_eq!(report.len(), 2);
        assert_eq!(report[0]["name"], "Alexandra");
        assert_eq!(report[1]["name"], "Sam");
    }

    #[tokio::test]
    async fn test_create_embeds_subset_summaries() {
        let store = MemoryStore::new();
        let id = create_employee(&store, payload(5, "Alex", Some(supervisor_ref("Jon Tan"))))
            .await
            .unwrap();

        let doc = store
            .find_one(EMPLOYEE, &json!({"_id": id}))
            .await
            .unwrap()
            .expect("employee");
        assert_eq!(doc["employee_id"], 5);
        assert_eq!(doc["contact"]["office_phone"], "6555 0001");
        // The summary is a subset: full-contact fields stay out
        assert!(doc["contact"].get("mobile_phone").is_none());
        assert_eq!(doc["supervisor"], json!({"employee_id": 1, "name": "Jon Tan"}));
        assert_eq!(store.count(CONTACT), 1);
    }

    #[tokio::test]
    async fn test_create_without_supervisor_stores_null() {
        let store = MemoryStore::new();
        let id = create_employee(&store, payload(5, "Alex", None)).await.unwrap();
        let doc = store
            .find_one(EMPLOYEE, &json!({"_id": id}))
            .await
            .unwrap()
            .expect("employee");
        assert_eq!(doc["supervisor"], Value::Null);
        assert_eq!(store.count(SUPERVISOR), 0);
    }

    #[tokio::test]
    async fn test_update_with_unknown_contact_keeps_supervisor_write() {
        let store = MemoryStore::new();
        let err = update_employee(
            &store,
            "missing-employee",
            "missing-contact",
            payload(5, "Alex", Some(supervisor_ref("Jon Tan"))),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(_)));
        // Supervisor-side write has already committed; no rollback
        assert_eq!(store.count(SUPERVISOR), 1);
    }

    #[tokio::test]
    async fn test_update_replaces_contact_and_employee_in_place() {
        let store = MemoryStore::new();
        let id = create_employee(&store, payload(5, "Alex", Some(supervisor_ref("Jon Tan"))))
            .await
            .unwrap();
        let employee = store
            .find_one(EMPLOYEE, &json!({"_id": id}))
            .await
            .unwrap()
            .unwrap();
        let contact_id = employee["contact"]["_id"].as_str().unwrap().to_string();

        let mut updated = payload(5, "Alex", Some(supervisor_ref("Jon Tan")));
        updated.designation = Some("Senior Engineer".to_string());
        update_employee(&store, &id, &contact_id, updated).await.unwrap();

        let employee = store
            .find_one(EMPLOYEE, &json!({"_id": id}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(employee["designation"], "Senior Engineer");
        assert_eq!(employee["contact"]["_id"], contact_id.as_str());
        // One contact document, replaced in place rather than re-created
        assert_eq!(store.count(CONTACT), 1);
        // The supervisor entry was replaced positionally, not duplicated
        let supervisor = store
            .find_one(SUPERVISOR, &json!({"name": "Jon Tan"}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(supervisor["review_report"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_employee_id_coercion() {
        assert_eq!(coerce_employee_id(&json!(5)), Some(5));
        assert_eq!(coerce_employee_id(&json!("42")), Some(42));
        assert_eq!(coerce_employee_id(&json!(" 7 ")), Some(7));
        assert_eq!(coerce_employee_id(&json!("seven")), None);
        assert_eq!(coerce_employee_id(&Value::Null), None);
        // Whole-valued floats coerce; fractional ones are rejected, not
        // truncated
        assert_eq!(coerce_employee_id(&json!(5.0)), Some(5));
        assert_eq!(coerce_employee_id(&json!(5.5)), None);
    }
}
