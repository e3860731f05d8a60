use std::sync::Arc;

use crate::{
    range::{effective_start, resolve_range, safe_head},
    state::{IndexerState, ReplayPhase},
    types::{BlockRange, ScanReport, TickOutcome},
};
use async_trait::async_trait;
use common::indexer::ReplaySettings;
use database::store::CheckpointStore;
use eyre::Error;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

/// Checkpointed replay of one tracked source.
///
/// Implementors supply the chain head and the per-range scan; the default
/// methods drive resolve, scan and advance, and the timer loop around them.
#[async_trait]
pub trait ChainIndexer: Send + Sync {
    fn checkpoint_key(&self) -> &str;
    fn get_replay_settings(&self) -> &ReplaySettings;
    fn get_checkpoint_store(&self) -> Arc<dyn CheckpointStore>;

    async fn get_current_chain_height(&self) -> eyre::Result<u64>;

    /// Scan every tracked event type over `range`.
    ///
    /// An `Err` means a query could not be opened; per-log problems are
    /// counted in the report instead.
    async fn scan_range(&self, range: BlockRange) -> eyre::Result<ScanReport>;

    /// One pass: resolve the safe range, scan it, then advance the checkpoint.
    #[instrument(skip_all, fields(KEY = %self.checkpoint_key()))]
    async fn run_once(&self) -> Result<TickOutcome, Error> {
        let mut state = IndexerState::new(self.checkpoint_key());
        let outcome = self.replay(&mut state).await;

        if outcome.is_err() {
            state.transition(ReplayPhase::Failed);
        }
        state.transition(ReplayPhase::Idle);

        outcome
    }

    async fn replay(&self, state: &mut IndexerState) -> Result<TickOutcome, Error> {
        let key = self.checkpoint_key();
        let settings = self.get_replay_settings();
        let store = self.get_checkpoint_store();

        state.transition(ReplayPhase::Resolving);
        let last_synced = store.get_checkpoint(key).await?;
        let chain_head = self.get_current_chain_height().await?;

        let Some(range) = resolve_range(
            last_synced,
            settings.start_block,
            chain_head,
            settings.confirmations,
        ) else {
            let safe_head = safe_head(chain_head, settings.confirmations);
            debug!(
                "Nothing to scan: resume point {} is at or past safe head {} (chain head {})",
                effective_start(last_synced, settings.start_block),
                safe_head,
                chain_head
            );
            return Ok(TickOutcome::UpToDate {
                checkpoint: last_synced,
                safe_head,
            });
        };

        info!(
            "Scanning blocks {} to {} ({} blocks, chain head {})",
            range.start,
            range.end,
            range.length(),
            chain_head
        );

        state.transition(ReplayPhase::Scanning);
        let report = self.scan_range(range).await?;

        if report.store_failures > 0 {
            return Err(eyre::eyre!(
                "{} records failed to persist in blocks {} to {}; checkpoint stays at {}",
                report.store_failures,
                range.start,
                range.end,
                last_synced
            ));
        }

        state.transition(ReplayPhase::Advancing);
        store.set_checkpoint(key, range.end).await?;

        info!(
            "Checkpoint advanced to {} ({} matched, {} new, {} duplicate, {} skipped)",
            range.end, report.matched, report.inserted, report.duplicates, report.skipped
        );

        Ok(TickOutcome::Advanced { range, report })
    }

    /// Runs a pass every `interval` until `cancel` fires.
    ///
    /// Cancellation is only observed between passes. Fires missed while a
    /// pass overruns are dropped, not queued.
    #[instrument(skip_all, fields(KEY = %self.checkpoint_key()))]
    async fn run_loop(&self, cancel: CancellationToken) {
        let period = self.get_replay_settings().interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!("Replay loop started with interval {:?}", period);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Replay loop cancelled");
                    break;
                }
                _ = ticker.tick() => {}
            }

            if let Err(e) = self.run_once().await {
                error!("Replay tick failed: {:?}", e);
            }
        }
    }

    /// Startup catch-up pass followed by the periodic loop.
    async fn run(&self, cancel: CancellationToken) {
        match self.run_once().await {
            Ok(outcome) => info!(key = %self.checkpoint_key(), "Catch-up pass finished: {:?}", outcome),
            Err(e) => error!(key = %self.checkpoint_key(), "Catch-up pass failed: {:?}", e),
        }

        self.run_loop(cancel).await;
    }
}
