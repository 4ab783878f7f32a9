// In-memory document store: named collections of JSON documents behind a
// process-wide read/write lock. Insert generates string UUID `_id`s.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use uuid::Uuid;

use super::filter::matches;
use super::project::project;
use super::update::apply_update;
use super::{DeleteReport, DocumentStore, StoreError, UpdateReport};

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document count for a collection; used by tests and the root listing.
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(
        &self,
        collection: &str,
        criteria: &Value,
        projection: Option<&Value>,
    ) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.read();
        let Some(documents) = collections.get(collection) else {
            return Ok(vec![]);
        };
        let mut out = Vec::new();
        for doc in documents {
            if matches(doc, criteria)? {
                out.push(match projection {
                    Some(fields) => project(doc, fields),
                    None => doc.clone(),
                });
            }
        }
        Ok(out)
    }

    async fn find_one(
        &self,
        collection: &str,
        criteria: &Value,
    ) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.read();
        let Some(documents) = collections.get(collection) else {
            return Ok(None);
        };
        for doc in documents {
            if matches(doc, criteria)? {
                return Ok(Some(doc.clone()));
            }
        }
        Ok(None)
    }

    async fn insert_one(&self, collection: &str, document: Value) -> Result<String, StoreError> {
        let Value::Object(mut map) = document else {
            return Err(StoreError::NotAnObject);
        };
        let id = match map.get("_id") {
            Some(Value::String(existing)) => existing.clone(),
            Some(other) => other.to_string(),
            None => {
                let generated = Uuid::new_v4().to_string();
                map.insert("_id".to_string(), Value::String(generated.clone()));
                generated
            }
        };
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .push(Value::Object(map));
        Ok(id)
    }

    async fn update_one(
        &self,
        collection: &str,
        criteria: &Value,
        update: &Value,
    ) -> Result<UpdateReport, StoreError> {
        let mut collections = self.collections.write();
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(UpdateReport::default());
        };
        for doc in documents.iter_mut() {
            if matches(doc, criteria)? {
                let modified = apply_update(doc, criteria, update)?;
                return Ok(UpdateReport {
                    matched: 1,
                    modified: modified as u64,
                });
            }
        }
        Ok(UpdateReport::default())
    }

    async fn delete_one(
        &self,
        collection: &str,
        criteria: &Value,
    ) -> Result<DeleteReport, StoreError> {
        let mut collections = self.collections.write();
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(DeleteReport::default());
        };
        let mut target = None;
        for (index, doc) in documents.iter().enumerate() {
            if matches(doc, criteria)? {
                target = Some(index);
                break;
            }
        }
        match target {
            Some(index) => {
                documents.remove(index);
                Ok(DeleteReport { deleted: 1 })
            }
            None => Ok(DeleteReport::default()),
        }
    }
}
