use thiserror::Error;

/// A single log that cannot be turned into an event record.
///
/// These never abort a scan; the offending log is skipped.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("Missing transaction hash in log")]
    MissingTransactionHash,
    #[error("Missing block number in log")]
    MissingBlockNumber,
    #[error("Missing log index in log")]
    MissingLogIndex,
    #[error("Failed to decode {event_type} event: {source}")]
    DecodeError {
        event_type: &'static str,
        #[source]
        source: alloy::sol_types::Error,
    },
}
