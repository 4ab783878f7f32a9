use std::sync::Arc;

use crate::store::DocumentStore;

/// Process-wide context constructed once at startup and handed to every
/// handler through axum state, instead of module-level db globals.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}
