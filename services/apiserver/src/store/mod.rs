//! Document storage abstraction.
//!
//! # Purpose
//! Entities are persisted as schemaless JSON documents grouped into named
//! collections. Handlers convert between documents and typed models at the
//! edge; backends only ever see field maps.
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A stored document: server-assigned id plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Map<String, Value>,
}

impl Document {
    /// Decodes the document into a model, exposing the id as the `id` field.
    pub fn into_model<T: DeserializeOwned>(self) -> StoreResult<T> {
        let mut data = self.data;
        data.insert("id".to_string(), Value::String(self.id));
        serde_json::from_value(Value::Object(data))
            .map_err(|err| StoreError::Unexpected(anyhow::Error::new(err).context("decode document")))
    }

    pub fn string_field(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(Value::as_str)
    }
}

/// Encodes a request payload into document fields. `None` options are
/// expected to be skipped by the payload's serializer.
pub fn into_fields<T: Serialize>(value: &T) -> StoreResult<Map<String, Value>> {
    match serde_json::to_value(value) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(StoreError::Unexpected(anyhow::anyhow!(
            "expected an object, got {other}"
        ))),
        Err(err) => Err(StoreError::Unexpected(
            anyhow::Error::new(err).context("encode document"),
        )),
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents in the collection, oldest first.
    async fn list(&self, collection: &str) -> StoreResult<Vec<Document>>;
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Document>;
    async fn create(&self, collection: &str, data: Map<String, Value>) -> StoreResult<Document>;
    /// Replaces the given fields and leaves the others untouched.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> StoreResult<Document>;
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;

    async fn health_check(&self) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}
