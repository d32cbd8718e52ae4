use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{Document, DocumentStore, SetOptions, WriteResult};
use crate::error::StoreError;

/// In-process store for tests and local runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<(String, String), Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError> {
        let documents = self.documents.read().await;
        Ok(documents
            .get(&(collection.to_string(), key.to_string()))
            .cloned())
    }

    async fn set(
        &self,
        collection: &str,
        key: &str,
        value: Document,
        options: SetOptions,
    ) -> Result<WriteResult, StoreError> {
        let mut documents = self.documents.write().await;
        let id = (collection.to_string(), key.to_string());

        match documents.get_mut(&id) {
            Some(existing) if options.merge => existing.extend(value),
            _ => {
                documents.insert(id, value);
            }
        }

        Ok(WriteResult::confirmed_now())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        self.documents
            .write()
            .await
            .remove(&(collection.to_string(), key.to_string()));
        Ok(())
    }
}
