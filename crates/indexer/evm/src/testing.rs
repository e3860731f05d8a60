//! Fixtures shared by this crate's tests.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use alloy::{
    primitives::{Address, B256},
    rpc::types::Log,
    sol_types::SolEvent,
};
use async_trait::async_trait;
use database::{
    client::DbClient,
    connect::{connect, migrate},
};
use eyre::eyre;

use crate::provider::LogProvider;

pub(crate) fn rpc_log<E: SolEvent>(
    event: &E,
    contract: Address,
    block_number: u64,
    tx_hash: B256,
    log_index: u64,
) -> Log {
    Log {
        inner: alloy::primitives::Log {
            address: contract,
            data: event.encode_log_data(),
        },
        block_number: Some(block_number),
        transaction_hash: Some(tx_hash),
        log_index: Some(log_index),
        ..Default::default()
    }
}

pub(crate) async fn memory_db() -> Arc<DbClient> {
    let conn = connect("sqlite::memory:").await.unwrap();
    migrate(&conn).await.unwrap();
    Arc::new(DbClient::new(conn))
}

/// A chain held in memory, answering the same filters a node would.
#[derive(Default)]
pub(crate) struct MockChain {
    head: Mutex<u64>,
    logs: Mutex<Vec<Log>>,
    failing: Mutex<HashSet<B256>>,
    queries: Mutex<Vec<(B256, u64, u64)>>,
}

impl MockChain {
    pub(crate) fn with_head(head: u64) -> Self {
        let chain = Self::default();
        chain.set_head(head);
        chain
    }

    pub(crate) fn set_head(&self, head: u64) {
        *self.head.lock().unwrap() = head;
    }

    pub(crate) fn push(&self, log: Log) {
        self.logs.lock().unwrap().push(log);
    }

    pub(crate) fn fail_queries_for(&self, signature: B256) {
        self.failing.lock().unwrap().insert(signature);
    }

    pub(crate) fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub(crate) fn queries(&self) -> Vec<(B256, u64, u64)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl LogProvider for MockChain {
    async fn get_block_number(&self) -> eyre::Result<u64> {
        Ok(*self.head.lock().unwrap())
    }

    async fn get_logs(
        &self,
        address: Address,
        signature: B256,
        from_block: u64,
        to_block: u64,
    ) -> eyre::Result<Vec<Log>> {
        self.queries
            .lock()
            .unwrap()
            .push((signature, from_block, to_block));

        if self.failing.lock().unwrap().contains(&signature) {
            return Err(eyre!("connection reset"));
        }

        let mut logs: Vec<Log> = self
            .logs
            .lock()
            .unwrap()
            .iter()
            .filter(|log| {
                log.inner.address == address
                    && log.topic0() == Some(&signature)
                    && log
                        .block_number
                        .is_some_and(|n| (from_block..=to_block).contains(&n))
            })
            .cloned()
            .collect();
        logs.sort_by_key(|log| (log.block_number, log.log_index));
        Ok(logs)
    }
}
