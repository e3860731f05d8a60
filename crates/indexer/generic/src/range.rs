//! Decides which blocks a replay pass may scan.

use crate::types::BlockRange;

/// The block just before the next one to scan.
///
/// With no checkpoint yet, this is one below `configured_start` so the first
/// range begins exactly at `configured_start`.
pub fn effective_start(last_synced: u64, configured_start: u64) -> u64 {
    if last_synced > 0 {
        last_synced
    } else {
        configured_start.saturating_sub(1)
    }
}

/// Highest block deep enough to scan, withholding the newest `confirmations - 1` blocks.
pub fn safe_head(chain_head: u64, confirmations: u64) -> u64 {
    if confirmations <= 1 {
        chain_head
    } else {
        chain_head.saturating_sub(confirmations - 1)
    }
}

/// Next range to scan, or `None` when the checkpoint already covers the safe head.
pub fn resolve_range(
    last_synced: u64,
    configured_start: u64,
    chain_head: u64,
    confirmations: u64,
) -> Option<BlockRange> {
    let from = effective_start(last_synced, configured_start);
    let to = safe_head(chain_head, confirmations);

    if from >= to {
        return None;
    }

    Some(BlockRange {
        start: from + 1,
        end: to,
    })
}
