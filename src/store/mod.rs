pub mod codegen;
pub mod error;
pub mod validate;

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::models::Link;
use crate::storage::Storage;

pub use error::{StoreError, StoreResult};

/// How a create call resolves a collision with an existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateAction {
    /// Overwrite the existing record's target in place.
    Modify,
}

pub const DEFAULT_LIST_LIMIT: i64 = 5;

/// Owns the id -> link mapping. All mutation goes through this type; the
/// persistence backend behind it only sees plain get/put/delete/scan calls.
///
/// Create's lookup-then-insert and resolve's read-increment each run under a
/// per-id async mutex, so the uniqueness and click-accounting guarantees
/// hold no matter which backend is plugged in. Distinct ids never contend.
pub struct LinkStore {
    backend: Arc<dyn Storage>,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

/// Holds one id's mutex for the duration of a critical section. On drop the
/// registry entry is reclaimed if no other task holds a handle to it, so
/// lookups of arbitrary never-existing ids cannot grow the map without bound.
struct IdGuard<'a> {
    store: &'a LinkStore,
    id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for IdGuard<'_> {
    fn drop(&mut self) {
        // Release the mutex before checking the count: at strong_count == 1
        // the map holds the only handle, and remove_if holds the shard lock
        // that any new clone would need, so removal cannot race a waiter.
        self.guard.take();
        self.store
            .locks
            .remove_if(self.id.as_str(), |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl LinkStore {
    pub fn new(backend: Arc<dyn Storage>) -> Self {
        Self {
            backend,
            locks: DashMap::new(),
        }
    }

    async fn lock_id(&self, id: &str) -> IdGuard<'_> {
        let lock = self.locks.entry(id.to_string()).or_default().clone();
        let guard = lock.lock_owned().await;
        IdGuard {
            store: self,
            id: id.to_string(),
            guard: Some(guard),
        }
    }

    /// Creates a link, allocating an id when the caller supplies none.
    ///
    /// Three-way outcome on lookup: no record -> insert; record plus a
    /// modify action -> overwrite the target only; record and no action ->
    /// `Conflict` carrying the existing target, nothing mutated.
    pub async fn create(
        &self,
        id: Option<&str>,
        original_link: &str,
        action: Option<CreateAction>,
    ) -> StoreResult<Link> {
        let id = match id {
            Some(id) => id.to_string(),
            None => codegen::generate_id(),
        };
        validate::validate(Some(&id), original_link)?;

        let _guard = self.lock_id(&id).await;

        match self.backend.get(&id).await? {
            None => {
                let link = Link {
                    id,
                    original_link: original_link.to_string(),
                    created_at: Utc::now(),
                    clicks: 0,
                };
                self.backend.put(&link).await?;
                Ok(link)
            }
            Some(existing) => match action {
                Some(CreateAction::Modify) => {
                    let link = Link {
                        original_link: original_link.to_string(),
                        ..existing
                    };
                    self.backend.put(&link).await?;
                    Ok(link)
                }
                None => Err(StoreError::Conflict {
                    existing_link: existing.original_link,
                }),
            },
        }
    }

    /// Overwrites the target of an existing link. A missing id is rejected
    /// with `NotFound`; update never creates records.
    pub async fn update(&self, id: &str, original_link: &str) -> StoreResult<Link> {
        validate::validate(Some(id), original_link)?;

        let _guard = self.lock_id(id).await;

        match self.backend.get(id).await? {
            None => Err(StoreError::NotFound),
            Some(existing) => {
                let link = Link {
                    original_link: original_link.to_string(),
                    ..existing
                };
                self.backend.put(&link).await?;
                Ok(link)
            }
        }
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let _guard = self.lock_id(id).await;

        if self.backend.delete(id).await? {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    /// Resolves an id to its target, counting the click. The lookup and the
    /// increment form one atomic unit per id: N concurrent resolutions of
    /// the same id always land as exactly +N.
    pub async fn resolve(&self, id: &str) -> StoreResult<Link> {
        let _guard = self.lock_id(id).await;

        match self.backend.get(id).await? {
            None => Err(StoreError::NotFound),
            Some(mut link) => {
                link.clicks += 1;
                self.backend.put(&link).await?;
                Ok(link)
            }
        }
    }

    /// Up to `limit` links in insertion order, plus the total record count
    /// (independent of `limit`).
    pub async fn list(&self, limit: i64) -> StoreResult<(Vec<Link>, i64)> {
        // Backends disagree on a negative LIMIT (SQLite reads it as
        // unlimited), so clamp before it reaches them.
        let items = self.backend.scan(limit.max(0)).await?;
        let count = self.backend.count().await?;
        Ok((items, count))
    }
}
