//! In-memory implementation of Store for testing and development

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::core::Store;

/// In-memory document store
///
/// Keys are held in order, so prefix queries come back sorted. Uses RwLock
/// for thread-safe access; cloning shares the underlying map.
#[derive(Clone)]
pub struct InMemoryStore {
    items: Arc<RwLock<BTreeMap<String, Value>>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Number of items currently held
    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    /// Whether the store holds no items
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let items = self
            .items
            .read()
            .map_err(|e| anyhow!("failed to acquire read lock: {}", e))?;

        Ok(items.get(key).cloned())
    }

    async fn put(&self, key: &str, item: Value) -> Result<()> {
        let mut items = self
            .items
            .write()
            .map_err(|e| anyhow!("failed to acquire write lock: {}", e))?;

        items.insert(key.to_string(), item);

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut items = self
            .items
            .write()
            .map_err(|e| anyhow!("failed to acquire write lock: {}", e))?;

        items.remove(key);

        Ok(())
    }

    async fn batch_get(&self, keys: &[String]) -> Result<Vec<Option<Value>>> {
        let items = self
            .items
            .read()
            .map_err(|e| anyhow!("failed to acquire read lock: {}", e))?;

        Ok(keys.iter().map(|key| items.get(key).cloned()).collect())
    }

    async fn batch_write(&self, batch: Vec<(String, Value)>) -> Result<()> {
        let mut items = self
            .items
            .write()
            .map_err(|e| anyhow!("failed to acquire write lock: {}", e))?;

        for (key, item) in batch {
            items.insert(key, item);
        }

        Ok(())
    }

    async fn query(&self, prefix: &str) -> Result<Vec<Value>> {
        let items = self
            .items
            .read()
            .map_err(|e| anyhow!("failed to acquire read lock: {}", e))?;

        Ok(items
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(_, item)| item.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_then_get() {
        let store = InMemoryStore::new();
        store
            .put("listing#1", json!({"title": "lamp"}))
            .await
            .unwrap();

        let item = store.get("listing#1").await.unwrap();
        assert_eq!(item, Some(json!({"title": "lamp"})));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = InMemoryStore::new();
        assert!(store.get("listing#9").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_replaces() {
        let store = InMemoryStore::new();
        store.put("listing#1", json!({"v": 1})).await.unwrap();
        store.put("listing#1", json!({"v": 2})).await.unwrap();
        assert_eq!(store.get("listing#1").await.unwrap(), Some(json!({"v": 2})));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = InMemoryStore::new();
        store.put("listing#1", json!({})).await.unwrap();
        store.delete("listing#1").await.unwrap();
        store.delete("listing#1").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_batch_get_preserves_key_order() {
        let store = InMemoryStore::new();
        store.put("a", json!(1)).await.unwrap();
        store.put("c", json!(3)).await.unwrap();

        let got = store
            .batch_get(&["c".to_string(), "b".to_string(), "a".to_string()])
            .await
            .unwrap();
        assert_eq!(got, vec![Some(json!(3)), None, Some(json!(1))]);
    }

    #[tokio::test]
    async fn test_batch_write_then_query_by_prefix() {
        let store = InMemoryStore::new();
        store
            .batch_write(vec![
                ("listing#2".to_string(), json!({"id": 2})),
                ("listing#1".to_string(), json!({"id": 1})),
                ("seller#1".to_string(), json!({"id": "s1"})),
            ])
            .await
            .unwrap();

        let listings = store.query("listing#").await.unwrap();
        assert_eq!(listings, vec![json!({"id": 1}), json!({"id": 2})]);
    }

    #[tokio::test]
    async fn test_query_no_match_is_empty() {
        let store = InMemoryStore::new();
        store.put("listing#1", json!({})).await.unwrap();
        assert!(store.query("order#").await.unwrap().is_empty());
    }

    #[test]
    fn test_clone_shares_the_map() {
        let store = InMemoryStore::new();
        let clone = store.clone();
        tokio_test::block_on(async {
            store.put("listing#1", json!({"v": 1})).await.unwrap();
            assert_eq!(clone.get("listing#1").await.unwrap(), Some(json!({"v": 1})));
        });
    }
}
