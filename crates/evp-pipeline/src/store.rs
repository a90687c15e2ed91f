//! Session store capability
//!
//! The pipeline persists session snapshots to an injected key-value store and
//! treats it as the single source of truth for progress queries. The store is
//! a black box: the pipeline does not specify its durability or replication,
//! and requires no coordination beyond last-write-wins on identical keys
//! (all writes for one session are already total-ordered by the aggregator).

use async_trait::async_trait;
use dashmap::DashMap;

/// Key-value capability for persisting serialized session snapshots
///
/// Usable concurrently: every validation task writes through it and status
/// queries read from it at any time.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist `value` under `key`, replacing any previous value
    async fn put(&self, key: &str, value: String) -> anyhow::Result<()>;

    /// Read the latest value persisted under `key`, if any
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
}

/// In-memory session store over a concurrent map
///
/// The built-in store implementation; suitable for a single-process
/// deployment and for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn put(&self, key: &str, value: String) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }
}
