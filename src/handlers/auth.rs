use axum::{extract::State, response::Json, Extension};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{generate_jwt, hash_password, verify_password, Claims};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

pub const USERS: &str = "users";

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /users - register a new account. No email-uniqueness check is
/// performed here; duplicate registrations land as separate documents.
pub async fn user_register(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (email, password) = require_credentials(&body)?;

    let hash = hash_password(password)?;
    let id = state
        .store
        .insert_one(USERS, json!({"email": email, "password": hash}))
        .await?;

    Ok(Json(json!({
        "message": "New user account has been created",
        "_id": id,
    })))
}

/// POST /login - verify credentials and issue a signed, time-limited
/// token. Wrong password and unknown email return the same 401, so the
/// response never reveals whether the account exists.
pub async fn user_login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (email, password) = require_credentials(&body)?;

    let user = state.store.find_one(USERS, &json!({"email": email})).await?;

    let authenticated = user.as_ref().and_then(|user| {
        let hash = user.get("password")?.as_str()?;
        if verify_password(password, hash) {
            Some(user)
        } else {
            None
        }
    });

    let Some(user) = authenticated else {
        return Err(ApiError::unauthorized("Invalid email or password"));
    };

    let user_id = user
        .get("_id")
        .and_then(|id| id.as_str())
        .unwrap_or_default()
        .to_string();
    let token = generate_jwt(Claims::new(user_id, email.to_string()))?;

    Ok(Json(json!({ "accessToken": token })))
}

/// GET /profile - echo the verified claims injected by the token gate
pub async fn profile(Extension(user): Extension<AuthUser>) -> Json<serde_json::Value> {
    Json(json!({
        "user": {
            "user_id": user.user_id,
            "email": user.email,
        }
    }))
}

fn require_credentials(body: &CredentialsRequest) -> Result<(&str, &str), ApiError> {
    let email = body.email.as_deref().filter(|s| !s.is_empty());
    let password = body.password.as_deref().filter(|s| !s.is_empty());
    match (email, password) {
        (Some(email), Some(password)) => Ok((email, password)),
        _ => Err(ApiError::validation_error(
            "Please provide email and password",
        )),
    }
}
