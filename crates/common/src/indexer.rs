use std::time::Duration;

use crate::config::EthConfig;

pub const DEFAULT_SOURCE: &str = "seaport";
pub const DEFAULT_CONFIRMATIONS: u64 = 1;
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Per-contract replay parameters, with unset values already defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaySettings {
    /// No block below this is scanned on the first run.
    pub start_block: u64,
    /// Always at least 1.
    pub confirmations: u64,
    /// Always at least one second.
    pub interval: Duration,
}

impl ReplaySettings {
    pub fn new(start_block: u64, confirmations: u64, interval_secs: u64) -> Self {
        let confirmations = if confirmations == 0 {
            DEFAULT_CONFIRMATIONS
        } else {
            confirmations
        };
        let interval = if interval_secs == 0 {
            DEFAULT_INTERVAL
        } else {
            Duration::from_secs(interval_secs)
        };

        Self {
            start_block,
            confirmations,
            interval,
        }
    }
}

impl From<&EthConfig> for ReplaySettings {
    fn from(cfg: &EthConfig) -> Self {
        Self::new(cfg.start_block, cfg.confirmations, cfg.interval)
    }
}
