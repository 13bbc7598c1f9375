use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::models::Link;
use crate::storage::Storage;

/// Volatile in-memory backend. Contents are lost on restart.
///
/// Each entry carries a monotonic sequence number so `scan` can report
/// records in insertion order; an overwrite keeps the original number.
pub struct MemoryStorage {
    entries: DashMap<String, (u64, Link)>,
    seq: AtomicU64,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            seq: AtomicU64::new(0),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Link>> {
        Ok(self.entries.get(id).map(|entry| entry.value().1.clone()))
    }

    async fn put(&self, link: &Link) -> Result<()> {
        match self.entries.entry(link.id.clone()) {
            Entry::Occupied(mut occupied) => {
                occupied.get_mut().1 = link.clone();
            }
            Entry::Vacant(vacant) => {
                let seq = self.seq.fetch_add(1, Ordering::Relaxed);
                vacant.insert((seq, link.clone()));
            }
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.entries.remove(id).is_some())
    }

    async fn scan(&self, limit: i64) -> Result<Vec<Link>> {
        let mut rows: Vec<(u64, Link)> = self
            .entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by_key(|(seq, _)| *seq);

        Ok(rows
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|(_, link)| link)
            .collect())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.entries.len() as i64)
    }
}
