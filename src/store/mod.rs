// Document store seam.
//
// Handlers and services are written against the `DocumentStore` trait;
// the bundled backend is the in-memory `MemoryStore`. Criteria, updates
// and projections are plain JSON values using the operator subset the
// API needs ($regex/$options, $in, $elemMatch, $set, $push, positional
// `array.$` sets, inclusion projections).

pub mod filter;
pub mod memory;
pub mod project;
pub mod update;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid criteria: {0}")]
    InvalidCriteria(String),

    #[error("invalid update document: {0}")]
    InvalidUpdate(String),

    #[error("invalid regular expression: {0}")]
    InvalidRegex(String),

    #[error("document must be a JSON object")]
    NotAnObject,
}

/// Outcome of an `update_one` call; `matched` is what the write
/// coordinator's fallback tiers key on.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UpdateReport {
    pub matched: u64,
    pub modified: u64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeleteReport {
    pub deleted: u64,
}

/// Collection-scoped document operations, modeled after the driver
/// surface the API consumes: find/findOne/insertOne/updateOne/deleteOne.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Return every document matching `criteria`, optionally reduced by an
    /// inclusion projection.
    async fn find(
        &self,
        collection: &str,
        criteria: &Value,
        projection: Option<&Value>,
    ) -> Result<Vec<Value>, StoreError>;

    /// Return the first document matching `criteria`, if any.
    async fn find_one(&self, collection: &str, criteria: &Value)
        -> Result<Option<Value>, StoreError>;

    /// Insert one document, generating an `_id` when absent. Returns the
    /// document's `_id` as a string.
    async fn insert_one(&self, collection: &str, document: Value) -> Result<String, StoreError>;

    /// Apply `update` to the first document matching `criteria`.
    async fn update_one(
        &self,
        collection: &str,
        criteria: &Value,
        update: &Value,
    ) -> Result<UpdateReport, StoreError>;

    /// Remove the first document matching `criteria`.
    async fn delete_one(
        &self,
        collection: &str,
        criteria: &Value,
    ) -> Result<DeleteReport, StoreError>;
}
