use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::filter::employee_criteria;
use crate::services::employee::{self, EmployeePayload, EMPLOYEE};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub name: Option<String>,
    pub supervisor: Option<String>,
}

/// GET /employee - filtered list with the public projection
pub async fn employee_list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let criteria = employee_criteria(query.name.as_deref(), query.supervisor.as_deref());
    let projection = json!({
        "name": 1,
        "employee_id": 1,
        "designation": 1,
        "contact": 1,
        "supervisor": 1,
    });
    let employee = state
        .store
        .find(EMPLOYEE, &criteria, Some(&projection))
        .await?;
    Ok(Json(json!({ "employee": employee })))
}

/// GET /employee/:id - single record by identifier
pub async fn employee_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let employee = state
        .store
        .find_one(EMPLOYEE, &json!({"_id": id}))
        .await?
        .ok_or_else(|| ApiError::not_found("Sorry, employee not found"))?;
    Ok(Json(json!({ "employee": employee })))
}

/// POST /employee - create the contact, sync the supervisor roster, then
/// insert the employee; answers 201 with the generated identifier
pub async fn employee_post(
    State(state): State<AppState>,
    Json(payload): Json<EmployeePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let id = employee::create_employee(state.store.as_ref(), payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "New employee has been created",
            "_id": id,
        })),
    ))
}

/// PUT /employee/:id/contact/:contactId/supervisor/:supervisorId - replace
/// in place. The supervisor path segment is accepted for the route shape;
/// supervisor resolution keys on the name in the body.
pub async fn employee_put(
    State(state): State<AppState>,
    Path((id, contact_id, _supervisor_id)): Path<(String, String, String)>,
    Json(payload): Json<EmployeePayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    employee::update_employee(state.store.as_ref(), &id, &contact_id, payload).await?;
    Ok(Json(json!({ "message": "Employee updated" })))
}

/// DELETE /employee/:id - no cascade: the contact document and any
/// supervisor-side entries are deliberately left behind
pub async fn employee_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = state.store.delete_one(EMPLOYEE, &json!({"_id": id})).await?;
    if result.deleted == 0 {
        return Err(ApiError::not_found("Employee not found"));
    }
    Ok(Json(json!({ "message": "Employee has been deleted" })))
}
