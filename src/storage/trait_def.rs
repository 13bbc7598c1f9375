use crate::models::Link;
use anyhow::Result;
use async_trait::async_trait;

/// Persistence contract the link store is written against. Whether records
/// live in a volatile mapping or a database is a deployment choice; the
/// store layers its own per-id serialization on top, so implementations only
/// need plain get/put/delete/scan semantics.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initialize the storage (create tables, etc.)
    async fn init(&self) -> Result<()>;

    /// Fetch a link by id
    async fn get(&self, id: &str) -> Result<Option<Link>>;

    /// Insert a link, or overwrite the record already stored under its id.
    /// Overwrites must not change the record's position in scan order.
    async fn put(&self, link: &Link) -> Result<()>;

    /// Remove a link; returns whether a record existed
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Up to `limit` links in insertion order
    async fn scan(&self, limit: i64) -> Result<Vec<Link>>;

    /// Total number of stored links, independent of any scan limit
    async fn count(&self) -> Result<i64>;
}
