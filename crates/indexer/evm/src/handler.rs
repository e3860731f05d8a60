use std::collections::BTreeMap;

use alloy::{
    primitives::{Address, B256},
    rpc::types::Log,
    sol_types::SolEvent,
};

use crate::error::ParserError;

/// Flat attribute map stored as an event's `event_args`.
///
/// Ordered so the serialized form is stable.
pub type EventAttributes = BTreeMap<String, String>;

/// Position of a log on chain; every stored record needs all three.
pub fn log_position(log: &Log) -> Result<(String, u64, u64), ParserError> {
    let tx_hash = log
        .transaction_hash
        .ok_or(ParserError::MissingTransactionHash)?;
    let block_number = log.block_number.ok_or(ParserError::MissingBlockNumber)?;
    let log_index = log.log_index.ok_or(ParserError::MissingLogIndex)?;

    Ok((format_hash(&tx_hash), block_number, log_index))
}

/// Decodes `log` as `T`. The log's position is checked when it is recorded.
pub fn extract_log<T: SolEvent>(log: &Log, event_name: &'static str) -> Result<T, ParserError> {
    let decoded = log
        .log_decode::<T>()
        .map_err(|e| ParserError::DecodeError {
            event_type: event_name,
            source: e,
        })?;

    Ok(decoded.inner.data)
}

/// Topic0 of the log, or empty when the log carries no topics.
pub fn signature_of(log: &Log) -> String {
    log.topic0().map(format_hash).unwrap_or_default()
}

/// Full lowercase `0x` hex.
pub fn format_hash(hash: &B256) -> String {
    format!("{hash:?}")
}

pub fn format_address(address: &Address) -> String {
    address.to_checksum(None)
}

pub fn attributes<const N: usize>(pairs: [(&str, String); N]) -> EventAttributes {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}
