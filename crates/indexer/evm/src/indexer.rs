use std::sync::Arc;

use alloy::primitives::Address;
use async_trait::async_trait;
use common::indexer::ReplaySettings;
use database::store::{CheckpointStore, EventStore};
use eyre::{Error, WrapErr};
use generic_indexer::{
    indexer::ChainIndexer,
    types::{BlockRange, ScanReport},
};
use tracing::{debug, error, instrument, warn};

use crate::{
    error::ParserError,
    provider::LogProvider,
    recorder::EventRecorder,
    registry::{EventConsumer, EventRegistry},
    seaport,
};

/// Checkpoint key for one contract: `source` followed by the lowercase `0x` address.
pub fn sync_key(source: &str, contract: &Address) -> String {
    format!("{}0x{}", source, hex::encode(contract.as_slice()))
}

pub struct EvmIndexer<P: LogProvider> {
    provider: Arc<P>,
    checkpoints: Arc<dyn CheckpointStore>,
    recorder: EventRecorder,
    registry: EventRegistry,
    contract: Address,
    key: String,
    settings: ReplaySettings,
}

impl<P: LogProvider> EvmIndexer<P> {
    /// Replays the Seaport consumer set for `contract`.
    pub fn new(
        provider: Arc<P>,
        checkpoints: Arc<dyn CheckpointStore>,
        events: Arc<dyn EventStore>,
        contract: Address,
        source: &str,
        settings: ReplaySettings,
    ) -> Self {
        Self {
            provider,
            checkpoints,
            recorder: EventRecorder::new(events),
            registry: seaport::registry(),
            contract,
            key: sync_key(source, &contract),
            settings,
        }
    }

    pub fn with_registry(mut self, registry: EventRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[instrument(skip_all, fields(EVENT = consumer.name))]
    async fn consume(
        &self,
        consumer: &EventConsumer,
        range: BlockRange,
    ) -> Result<ScanReport, Error> {
        let logs = self
            .provider
            .get_logs(self.contract, consumer.signature, range.start, range.end)
            .await
            .wrap_err_with(|| {
                format!(
                    "Failed to query {} logs for blocks {} to {}",
                    consumer.name, range.start, range.end
                )
            })?;

        let mut report = ScanReport {
            matched: logs.len(),
            ..Default::default()
        };

        for log in &logs {
            let attributes = match (consumer.decode)(log) {
                Ok(attributes) => attributes,
                Err(e) => {
                    warn!("Skipping {} log: {}", consumer.name, e);
                    report.skipped += 1;
                    continue;
                }
            };

            match self.recorder.record(log, consumer.name, attributes).await {
                Ok(true) => report.inserted += 1,
                Ok(false) => report.duplicates += 1,
                Err(e) if e.downcast_ref::<ParserError>().is_some() => {
                    warn!("Skipping {} log: {}", consumer.name, e);
                    report.skipped += 1;
                }
                Err(e) => {
                    error!(
                        "Failed to store {} log {:?}#{:?}: {:?}",
                        consumer.name, log.transaction_hash, log.log_index, e
                    );
                    report.store_failures += 1;
                }
            }
        }

        if !logs.is_empty() {
            debug!(
                "{} logs in {}: {} new, {} already recorded",
                report.matched, range, report.inserted, report.duplicates
            );
        }

        Ok(report)
    }
}

#[async_trait]
impl<P: LogProvider> ChainIndexer for EvmIndexer<P> {
    fn checkpoint_key(&self) -> &str {
        &self.key
    }

    fn get_replay_settings(&self) -> &ReplaySettings {
        &self.settings
    }

    fn get_checkpoint_store(&self) -> Arc<dyn CheckpointStore> {
        self.checkpoints.clone()
    }

    async fn get_current_chain_height(&self) -> eyre::Result<u64> {
        self.provider.get_block_number().await
    }

    /// Runs every consumer over `range` in registration order. A failed log
    /// query aborts the scan; records already stored by earlier consumers stay.
    async fn scan_range(&self, range: BlockRange) -> eyre::Result<ScanReport> {
        let mut report = ScanReport::default();
        for consumer in self.registry.consumers() {
            let consumed = self.consume(consumer, range).await?;
            report.merge(&consumed);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use alloy::{
        primitives::{Bytes, LogData, B256, U256},
        sol_types::SolEvent,
    };
    use database::{client::DbClient, store::EventRecord};
    use generic_indexer::types::TickOutcome;

    use super::*;
    use crate::{
        seaport::{CounterIncremented, OrderCancelled, OrderFulfilled, OrdersMatched},
        testing::{memory_db, rpc_log, MockChain},
    };

    fn contract() -> Address {
        Address::repeat_byte(0xaa)
    }

    fn indexer(
        chain: &Arc<MockChain>,
        db: &Arc<DbClient>,
        start_block: u64,
        confirmations: u64,
    ) -> EvmIndexer<MockChain> {
        EvmIndexer::new(
            chain.clone(),
            db.clone(),
            db.clone(),
            contract(),
            seaport::SOURCE,
            ReplaySettings::new(start_block, confirmations, 1),
        )
    }

    fn cancelled(block: u64, tx: u8, index: u64) -> alloy::rpc::types::Log {
        let event = OrderCancelled {
            orderHash: B256::repeat_byte(0xab),
            offerer: Address::repeat_byte(0x22),
            zone: Address::ZERO,
        };
        rpc_log(&event, contract(), block, B256::repeat_byte(tx), index)
    }

    fn key() -> String {
        sync_key(seaport::SOURCE, &contract())
    }

    /// Refuses every record of one event type and stores the rest.
    struct RefusingStore {
        inner: Arc<DbClient>,
        refused: &'static str,
    }

    #[async_trait]
    impl EventStore for RefusingStore {
        async fn insert_event(&self, record: EventRecord) -> eyre::Result<bool> {
            if record.event == self.refused {
                return Err(eyre::eyre!("disk full"));
            }
            self.inner.insert_event(record).await
        }
    }

    #[test]
    fn sync_key_uses_lowercase_address() {
        let addr: Address = "0x00000000000000ADc04C56Bf30aC9d3c0aAF14dC".parse().unwrap();
        assert_eq!(
            sync_key("seaport", &addr),
            "seaport0x00000000000000adc04c56bf30ac9d3c0aaf14dc"
        );
    }

    #[tokio::test]
    async fn first_pass_records_events_and_advances() {
        let chain = Arc::new(MockChain::with_head(50));
        let db = memory_db().await;
        chain.push(cancelled(20, 0x11, 3));

        let outcome = indexer(&chain, &db, 10, 1).run_once().await.unwrap();
        let TickOutcome::Advanced { range, report } = outcome else {
            panic!("expected an advance");
        };
        assert_eq!(range, BlockRange { start: 10, end: 50 });
        assert_eq!(report.inserted, 1);

        let row = db
            .find_event_log(&format!("0x{}", "11".repeat(32)), 3)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.event, "OrderCancelled");
        assert_eq!(row.block_number, 20);
        assert_eq!(row.contract, contract().to_checksum(None));

        let args: serde_json::Value = serde_json::from_str(&row.event_args).unwrap();
        assert_eq!(args["orderHash"], format!("0x{}", "ab".repeat(32)));
        assert_eq!(args["offerer"], Address::repeat_byte(0x22).to_checksum(None));
        assert_eq!(args["zone"], Address::ZERO.to_checksum(None));
        assert_eq!(
            args["signature"],
            format!("{:?}", OrderCancelled::SIGNATURE_HASH)
        );

        assert_eq!(db.get_sync_state(&key()).await.unwrap(), Some(50));
    }

    #[tokio::test]
    async fn every_consumer_queries_the_same_range_in_order() {
        let chain = Arc::new(MockChain::with_head(50));
        let db = memory_db().await;

        indexer(&chain, &db, 10, 1).run_once().await.unwrap();

        let queries = chain.queries();
        let signatures: Vec<B256> = queries.iter().map(|q| q.0).collect();
        assert_eq!(
            signatures,
            seaport::registry()
                .consumers()
                .iter()
                .map(|c| c.signature)
                .collect::<Vec<_>>()
        );
        assert!(queries.iter().all(|q| q.1 == 10 && q.2 == 50));
    }

    #[tokio::test]
    async fn rerun_is_idempotent() {
        let chain = Arc::new(MockChain::with_head(50));
        let db = memory_db().await;
        chain.push(cancelled(20, 0x11, 3));
        let indexer = indexer(&chain, &db, 10, 1);

        indexer.run_once().await.unwrap();
        let outcome = indexer.run_once().await.unwrap();

        assert!(matches!(outcome, TickOutcome::UpToDate { checkpoint: 50, .. }));
        assert_eq!(db.count_event_logs().await.unwrap(), 1);
        assert_eq!(db.get_sync_state(&key()).await.unwrap(), Some(50));
    }

    #[tokio::test]
    async fn replaying_a_range_counts_duplicates() {
        let chain = Arc::new(MockChain::with_head(50));
        let db = memory_db().await;
        chain.push(cancelled(20, 0x11, 3));
        indexer(&chain, &db, 10, 1).run_once().await.unwrap();

        let report = indexer(&chain, &db, 10, 1)
            .scan_range(BlockRange { start: 10, end: 50 })
            .await
            .unwrap();

        assert_eq!(report.inserted, 0);
        assert_eq!(report.duplicates, 1);
        assert_eq!(db.count_event_logs().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unconfirmed_blocks_wait_for_depth() {
        let chain = Arc::new(MockChain::with_head(100));
        let db = memory_db().await;
        chain.push(cancelled(97, 0x11, 0));
        let indexer = indexer(&chain, &db, 90, 5);

        indexer.run_once().await.unwrap();
        assert_eq!(db.count_event_logs().await.unwrap(), 0);
        assert_eq!(db.get_sync_state(&key()).await.unwrap(), Some(96));

        chain.set_head(101);
        indexer.run_once().await.unwrap();
        assert_eq!(db.count_event_logs().await.unwrap(), 1);
        assert_eq!(db.get_sync_state(&key()).await.unwrap(), Some(97));
    }

    #[tokio::test]
    async fn undecodable_logs_are_skipped() {
        let chain = Arc::new(MockChain::with_head(50));
        let db = memory_db().await;

        let mut broken = cancelled(15, 0x12, 0);
        broken.inner.data =
            LogData::new_unchecked(vec![OrderCancelled::SIGNATURE_HASH], Bytes::from(vec![7]));
        chain.push(broken);
        chain.push(cancelled(20, 0x11, 3));

        let outcome = indexer(&chain, &db, 10, 1).run_once().await.unwrap();
        let TickOutcome::Advanced { report, .. } = outcome else {
            panic!("expected an advance");
        };

        assert_eq!(report.matched, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.inserted, 1);
        assert_eq!(db.get_sync_state(&key()).await.unwrap(), Some(50));
    }

    #[tokio::test]
    async fn failed_query_keeps_checkpoint_and_earlier_records() {
        let chain = Arc::new(MockChain::with_head(50));
        let db = memory_db().await;
        let counter = CounterIncremented {
            newCounter: U256::from(1),
            offerer: Address::repeat_byte(0x22),
        };
        chain.push(rpc_log(&counter, contract(), 12, B256::repeat_byte(0x10), 0));
        chain.push(cancelled(20, 0x11, 3));
        chain.fail_queries_for(OrderFulfilled::SIGNATURE_HASH);
        let indexer = indexer(&chain, &db, 10, 1);

        assert!(indexer.run_once().await.is_err());
        assert_eq!(db.count_event_logs().await.unwrap(), 2);
        assert_eq!(db.get_sync_state(&key()).await.unwrap(), None);

        chain.heal();
        indexer.run_once().await.unwrap();
        assert_eq!(db.count_event_logs().await.unwrap(), 2);
        assert_eq!(db.get_sync_state(&key()).await.unwrap(), Some(50));
    }

    #[tokio::test]
    async fn store_failure_finishes_scan_but_holds_checkpoint() {
        let chain = Arc::new(MockChain::with_head(50));
        let db = memory_db().await;
        let counter = CounterIncremented {
            newCounter: U256::from(1),
            offerer: Address::repeat_byte(0x22),
        };
        chain.push(rpc_log(&counter, contract(), 12, B256::repeat_byte(0x10), 0));
        chain.push(cancelled(20, 0x11, 3));
        let events = Arc::new(RefusingStore {
            inner: db.clone(),
            refused: "CounterIncremented",
        });
        let indexer = EvmIndexer::new(
            chain.clone(),
            db.clone(),
            events,
            contract(),
            seaport::SOURCE,
            ReplaySettings::new(10, 1, 1),
        );

        let err = indexer.run_once().await.unwrap_err();
        assert!(err.to_string().contains("failed to persist"));
        assert_eq!(chain.queries().len(), 5);
        assert_eq!(db.count_event_logs().await.unwrap(), 1);
        assert!(db
            .find_event_log(&format!("0x{}", "11".repeat(32)), 3)
            .await
            .unwrap()
            .is_some());
        assert_eq!(db.get_sync_state(&key()).await.unwrap(), None);

        let report = indexer
            .scan_range(BlockRange { start: 10, end: 50 })
            .await
            .unwrap();
        assert_eq!(report.store_failures, 1);
        assert_eq!(report.duplicates, 1);
    }

    #[tokio::test]
    async fn logs_from_other_contracts_are_ignored() {
        let chain = Arc::new(MockChain::with_head(50));
        let db = memory_db().await;
        let event = OrdersMatched {
            orderHashes: vec![B256::repeat_byte(1)],
        };
        chain.push(rpc_log(&event, Address::repeat_byte(0xbb), 20, B256::repeat_byte(1), 0));

        indexer(&chain, &db, 10, 1).run_once().await.unwrap();
        assert_eq!(db.count_event_logs().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn custom_registry_limits_consumers() {
        let chain = Arc::new(MockChain::with_head(50));
        let db = memory_db().await;
        chain.push(cancelled(20, 0x11, 3));

        let mut registry = EventRegistry::new();
        registry.register::<OrdersMatched>(seaport::handlers::orders_matched);
        let indexer = indexer(&chain, &db, 10, 1).with_registry(registry);

        indexer.run_once().await.unwrap();
        assert_eq!(chain.queries().len(), 1);
        assert_eq!(db.count_event_logs().await.unwrap(), 0);
    }
}
