//! In-memory cache storage

use crate::cache::storage::{matchable_key, storable_key, CacheStorage, RequestKey};
use crate::error::{AgentError, AgentResult};
use crate::http::{Request, Response};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

type Store = BTreeMap<RequestKey, Response>;

/// Cache storage held entirely in memory
///
/// Clones share the same stores.
#[derive(Debug, Clone, Default)]
pub struct MemoryCacheStorage {
    stores: Arc<RwLock<BTreeMap<String, Store>>>,
}

impl MemoryCacheStorage {
    /// Create an empty storage
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, name: &str) -> AgentResult<()> {
        self.stores
            .write()
            .await
            .entry(name.to_string())
            .or_default();
        Ok(())
    }

    async fn has(&self, name: &str) -> AgentResult<bool> {
        Ok(self.stores.read().await.contains_key(name))
    }

    async fn keys(&self) -> AgentResult<Vec<String>> {
        Ok(self.stores.read().await.keys().cloned().collect())
    }

    async fn delete(&self, name: &str) -> AgentResult<bool> {
        Ok(self.stores.write().await.remove(name).is_some())
    }

    async fn put(&self, name: &str, request: &Request, response: &Response) -> AgentResult<()> {
        let key = storable_key(request)?;
        self.stores
            .write()
            .await
            .entry(name.to_string())
            .or_default()
            .insert(key, response.clone());
        Ok(())
    }

    async fn match_in(&self, name: &str, request: &Request) -> AgentResult<Option<Response>> {
        let Some(key) = matchable_key(request) else {
            return Ok(None);
        };
        Ok(self
            .stores
            .read()
            .await
            .get(name)
            .and_then(|store| store.get(&key))
            .cloned())
    }

    async fn entries(&self, name: &str) -> AgentResult<Vec<RequestKey>> {
        self.stores
            .read()
            .await
            .get(name)
            .map(|store| store.keys().cloned().collect())
            .ok_or_else(|| AgentError::CacheNotFound(name.to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
