//! Document store seam.
//!
//! The handler only ever talks to a [`DocumentStore`]; production wires in
//! [`DynamoStore`], tests and local runs use [`MemoryStore`].

mod dynamo;
mod memory;

pub use dynamo::DynamoStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::StoreError;

/// Schemaless document body
pub type Document = Map<String, Value>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Shallow-merge into an existing document instead of replacing it
    pub merge: bool,
}

impl SetOptions {
    pub fn replace() -> Self {
        Self { merge: false }
    }

    pub fn merge() -> Self {
        Self { merge: true }
    }
}

/// Acknowledgement of a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteResult {
    pub write_time: Option<DateTime<Utc>>,
}

impl WriteResult {
    pub fn confirmed_now() -> Self {
        Self {
            write_time: Some(Utc::now()),
        }
    }
}

/// Key/value document store with atomic per-document operations.
///
/// No cross-document transactions: a `get` followed by a `set` can race
/// with another writer.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document, `None` when it does not exist
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError>;

    /// Upsert a document
    async fn set(
        &self,
        collection: &str,
        key: &str,
        value: Document,
        options: SetOptions,
    ) -> Result<WriteResult, StoreError>;

    /// Remove a document. Deleting a missing key succeeds.
    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError>;
}
