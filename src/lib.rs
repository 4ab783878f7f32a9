pub mod auth;
pub mod config;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;
pub mod store;

use axum::{
    middleware::from_fn,
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{auth as auth_handlers, contact, employee, supervisor, taskforce};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Build the full application router around an injected store.
pub fn app(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/taskforce", get(taskforce::taskforce_list))
        .route("/supervisor", get(supervisor::supervisor_list))
        .route("/contact", get(contact::contact_list))
        .route("/employee", get(employee::employee_list).post(employee::employee_post))
        .route("/employee/:id", get(employee::employee_get))
        .route(
            "/employee/:id/contact/:contactId/supervisor/:supervisorId",
            put(employee::employee_put),
        )
        .route("/users", post(auth_handlers::user_register))
        .route("/login", post(auth_handlers::user_login));

    // Bearer-token gate: these answer 403 before any handler logic runs
    let protected = Router::new()
        .route("/employee/:id", delete(employee::employee_delete))
        .route("/profile", get(auth_handlers::profile))
        .route_layer(from_fn(jwt_auth_middleware));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "message": "RESTful HR directory API",
        "name": "staffdir-api",
        "version": version,
        "endpoints": {
            "home": "GET / (public)",
            "taskforce": "GET /taskforce?members=a,b (public)",
            "supervisor": "GET /supervisor?name=&review_report= (public)",
            "contact": "GET /contact (public)",
            "employee": "GET /employee?name=&supervisor=, GET /employee/:id, POST /employee (public)",
            "employee_update": "PUT /employee/:id/contact/:contactId/supervisor/:supervisorId (public)",
            "employee_delete": "DELETE /employee/:id (bearer token)",
            "users": "POST /users (public)",
            "login": "POST /login (public)",
            "profile": "GET /profile (bearer token)",
        }
    }))
}
