use std::sync::Arc;

use anyhow::Result;

use staffdir_api::state::AppState;
use staffdir_api::store::MemoryStore;

pub struct TestServer {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
}

/// Spawn the router in-process on an ephemeral port with a fresh in-memory
/// store. Every test that wants isolation spawns its own server.
pub async fn spawn_server() -> Result<TestServer> {
    // The config singleton reads the secret once; make sure one is present
    // before anything touches it
    if std::env::var("TOKEN_SECRET").is_err() {
        std::env::set_var("TOKEN_SECRET", "integration-test-secret");
    }

    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, staffdir_api::app(state))
            .await
            .expect("server");
    });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
        store,
    })
}
