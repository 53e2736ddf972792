//! In-memory document store.
//!
//! # Purpose
//! Keeps every collection in a `HashMap` guarded by `tokio::sync::RwLock`.
//! Used for local development, tests, and deployments that do not need
//! durability.
//!
//! # Durability and consistency
//! - **Not durable**: all state is lost on process restart.
//! - **Single-process consistency**: writes take the write lock, reads share
//!   the read lock.
//!
//! # Metrics
//! Updates `reviewhub_documents_total{collection}` after every mutation.
use super::{Document, DocumentStore, StoreError, StoreResult};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct StoredDocument {
    seq: u64,
    data: Map<String, Value>,
}

#[derive(Debug, Default)]
struct Collections {
    next_seq: u64,
    items: HashMap<String, HashMap<String, StoredDocument>>,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(collection: &str, id: &str) -> StoreError {
    StoreError::NotFound(format!("{collection}/{id}"))
}

fn record_size(collection: &str, size: usize) {
    metrics::gauge!("reviewhub_documents_total", "collection" => collection.to_string())
        .set(size as f64);
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn list(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let guard = self.inner.read().await;
        let Some(documents) = guard.items.get(collection) else {
            return Ok(Vec::new());
        };
        let mut entries: Vec<_> = documents.iter().collect();
        entries.sort_by_key(|(_, stored)| stored.seq);
        Ok(entries
            .into_iter()
            .map(|(id, stored)| Document {
                id: id.clone(),
                data: stored.data.clone(),
            })
            .collect())
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Document> {
        let guard = self.inner.read().await;
        guard
            .items
            .get(collection)
            .and_then(|documents| documents.get(id))
            .map(|stored| Document {
                id: id.to_string(),
                data: stored.data.clone(),
            })
            .ok_or_else(|| not_found(collection, id))
    }

    async fn create(&self, collection: &str, data: Map<String, Value>) -> StoreResult<Document> {
        let mut guard = self.inner.write().await;
        let seq = guard.next_seq;
        guard.next_seq += 1;
        let id = uuid::Uuid::new_v4().simple().to_string();
        let documents = guard.items.entry(collection.to_string()).or_default();
        documents.insert(
            id.clone(),
            StoredDocument {
                seq,
                data: data.clone(),
            },
        );
        record_size(collection, documents.len());
        Ok(Document { id, data })
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> StoreResult<Document> {
        let mut guard = self.inner.write().await;
        let stored = guard
            .items
            .get_mut(collection)
            .and_then(|documents| documents.get_mut(id))
            .ok_or_else(|| not_found(collection, id))?;
        stored.data.extend(data);
        Ok(Document {
            id: id.to_string(),
            data: stored.data.clone(),
        })
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let mut guard = self.inner.write().await;
        let documents = guard
            .items
            .get_mut(collection)
            .ok_or_else(|| not_found(collection, id))?;
        if documents.remove(id).is_none() {
            return Err(not_found(collection, id));
        }
        record_size(collection, documents.len());
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
