use std::sync::Arc;

use staffdir_api::state::AppState;
use staffdir_api::store::MemoryStore;
use staffdir_api::{app, config};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up TOKEN_SECRET, PORT, etc.
    let _ = dotenvy::dotenv();

    let config = config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting staffdir API in {:?} mode", config.environment);

    // The store handle is built once and injected into every handler
    let state = AppState::new(Arc::new(MemoryStore::new()));
    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("staffdir API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
