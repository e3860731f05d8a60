use std::sync::Arc;

use alloy::rpc::types::Log;
use database::store::{EventRecord, EventStore};

use crate::handler::{format_address, log_position, signature_of, EventAttributes};

/// Normalizes decoded events and hands them to the event store.
#[derive(Clone)]
pub struct EventRecorder {
    store: Arc<dyn EventStore>,
}

impl EventRecorder {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Builds the stored form of one event. `signature` is always added to
    /// the attributes and overrides a decoder-supplied value.
    pub fn normalize(
        log: &Log,
        event_name: &str,
        mut attributes: EventAttributes,
    ) -> eyre::Result<EventRecord> {
        let (tx_hash, block_number, log_index) = log_position(log)?;
        attributes.insert("signature".to_string(), signature_of(log));

        Ok(EventRecord {
            tx_hash,
            log_index,
            block_number,
            event: event_name.to_string(),
            event_args: serde_json::to_string(&attributes)?,
            contract: format_address(&log.inner.address),
        })
    }

    /// `Ok(true)` when a new record was stored, `Ok(false)` when the log was
    /// already recorded.
    pub async fn record(
        &self,
        log: &Log,
        event_name: &str,
        attributes: EventAttributes,
    ) -> eyre::Result<bool> {
        let record = Self::normalize(log, event_name, attributes)?;
        self.store.insert_event(record).await
    }
}

#[cfg(test)]
mod tests {
    use alloy::{
        primitives::{Address, B256},
        sol_types::SolEvent,
    };

    use super::*;
    use crate::{
        error::ParserError,
        handler::attributes,
        seaport::OrderCancelled,
        testing::{memory_db, rpc_log},
    };

    fn cancelled_log() -> Log {
        let event = OrderCancelled {
            orderHash: B256::repeat_byte(0xab),
            offerer: Address::repeat_byte(0x22),
            zone: Address::ZERO,
        };
        rpc_log(&event, Address::repeat_byte(0xaa), 20, B256::repeat_byte(0x11), 4)
    }

    #[test]
    fn normalize_adds_signature_and_position() {
        let record = EventRecorder::normalize(
            &cancelled_log(),
            "OrderCancelled",
            attributes([("zone", "z".to_string()), ("signature", "forged".to_string())]),
        )
        .unwrap();

        assert_eq!(record.tx_hash, format!("0x{}", "11".repeat(32)));
        assert_eq!(record.block_number, 20);
        assert_eq!(record.log_index, 4);
        assert_eq!(record.event, "OrderCancelled");
        assert_eq!(record.contract, Address::repeat_byte(0xaa).to_checksum(None));
        assert_eq!(
            record.event_args,
            format!(
                r#"{{"signature":"{:?}","zone":"z"}}"#,
                OrderCancelled::SIGNATURE_HASH
            )
        );
    }

    #[tokio::test]
    async fn recording_twice_keeps_one_row() {
        let db = memory_db().await;
        let recorder = EventRecorder::new(db.clone());
        let log = cancelled_log();

        assert!(recorder.record(&log, "OrderCancelled", attributes([])).await.unwrap());
        assert!(!recorder.record(&log, "OrderCancelled", attributes([])).await.unwrap());
        assert_eq!(db.count_event_logs().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn missing_tx_hash_is_a_parser_error() {
        let db = memory_db().await;
        let recorder = EventRecorder::new(db.clone());
        let mut log = cancelled_log();
        log.transaction_hash = None;

        let err = recorder
            .record(&log, "OrderCancelled", attributes([]))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ParserError>(),
            Some(ParserError::MissingTransactionHash)
        ));
        assert_eq!(db.count_event_logs().await.unwrap(), 0);
    }
}
