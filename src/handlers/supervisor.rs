use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::filter::supervisor_criteria;
use crate::services::employee::SUPERVISOR;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub name: Option<String>,
    pub review_report: Option<String>,
}

/// GET /supervisor - filtered list; the projection keeps the name and the
/// subordinate name/rank pairs out of each review_report entry
pub async fn supervisor_list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let criteria = supervisor_criteria(query.name.as_deref(), query.review_report.as_deref());
    let projection = json!({
        "name": 1,
        "review_report.name": 1,
        "review_report.rank": 1,
    });
    let supervisor = state
        .store
        .find(SUPERVISOR, &criteria, Some(&projection))
        .await?;
    Ok(Json(json!({ "supervisor": supervisor })))
}
