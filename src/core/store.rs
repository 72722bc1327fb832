//! Narrow persistence seam consumed by handler business logic
//!
//! The pipeline never talks to a database itself; business functions receive
//! a [`Store`] and the pipeline stays agnostic to what sits behind it. Items
//! are JSON documents addressed by string keys. Retry and backoff policy, if
//! any, belongs to the implementation, never to the pipeline.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Key-addressed document storage
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch one item by key
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Write one item, replacing any existing value
    async fn put(&self, key: &str, item: Value) -> Result<()>;

    /// Remove one item; removing a missing key is not an error
    async fn delete(&self, key: &str) -> Result<()>;

    /// Fetch several items at once, preserving the order of `keys`
    async fn batch_get(&self, keys: &[String]) -> Result<Vec<Option<Value>>>;

    /// Write several items at once
    async fn batch_write(&self, items: Vec<(String, Value)>) -> Result<()>;

    /// List items whose key starts with `prefix`, in key order
    async fn query(&self, prefix: &str) -> Result<Vec<Value>>;
}
