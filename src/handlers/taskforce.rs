use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::filter::taskforce_criteria;
use crate::state::AppState;

pub const TASKFORCE: &str = "taskforce";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub members: Option<String>,
}

/// GET /taskforce - filtered by member names (comma-separated, each token
/// a case-insensitive substring match)
pub async fn taskforce_list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let criteria = taskforce_criteria(query.members.as_deref());
    let projection = json!({
        "members.name": 1,
        "members.role": 1,
    });
    let taskforce = state
        .store
        .find(TASKFORCE, &criteria, Some(&projection))
        .await?;
    Ok(Json(json!({ "taskforce": taskforce })))
}
