use axum::{extract::State, response::Json};
use serde_json::json;

use crate::error::ApiError;
use crate::services::employee::CONTACT;
use crate::state::AppState;

/// GET /contact - unfiltered list of the personal contact fields
pub async fn contact_list(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let projection = json!({
        "address1": 1,
        "address2": 1,
        "address3": 1,
        "mobile_phone": 1,
        "home_phone": 1,
        "personal_email": 1,
    });
    let contact = state
        .store
        .find(CONTACT, &json!({}), Some(&projection))
        .await?;
    Ok(Json(json!({ "contact": contact })))
}
