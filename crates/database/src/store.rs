//! Storage seams used by the replay engine.
//!
//! The indexer only depends on these traits; `DbClient` is the production
//! implementation.

use async_trait::async_trait;

use crate::client::DbClient;

/// One normalized contract event, keyed by `(tx_hash, log_index)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub tx_hash: String,
    pub log_index: u64,
    pub block_number: u64,
    pub event: String,
    /// Serialized attribute map.
    pub event_args: String,
    pub contract: String,
}

#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Last processed block for `key`; 0 when nothing was synced yet.
    async fn get_checkpoint(&self, key: &str) -> eyre::Result<u64>;

    /// Create-or-overwrite the checkpoint for `key`.
    async fn set_checkpoint(&self, key: &str, block_number: u64) -> eyre::Result<()>;
}

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Insert-or-ignore; `true` only when a new row was created.
    async fn insert_event(&self, record: EventRecord) -> eyre::Result<bool>;
}

#[async_trait]
impl CheckpointStore for DbClient {
    async fn get_checkpoint(&self, key: &str) -> eyre::Result<u64> {
        Ok(self.get_sync_state(key).await?.unwrap_or(0))
    }

    async fn set_checkpoint(&self, key: &str, block_number: u64) -> eyre::Result<()> {
        self.upsert_sync_state(key, block_number).await
    }
}

#[async_trait]
impl EventStore for DbClient {
    async fn insert_event(&self, record: EventRecord) -> eyre::Result<bool> {
        self.insert_event_log(record).await
    }
}
