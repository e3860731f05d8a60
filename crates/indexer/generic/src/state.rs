use std::fmt;

use tracing::{debug, warn};

/// Phases of one replay pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayPhase {
    Idle,
    Resolving,
    Scanning,
    Advancing,
    Failed,
}

impl ReplayPhase {
    pub fn can_transition(self, to: ReplayPhase) -> bool {
        use ReplayPhase::*;
        matches!(
            (self, to),
            (Idle, Resolving)
                | (Resolving, Scanning)
                | (Resolving, Idle)
                | (Scanning, Advancing)
                | (Advancing, Idle)
                | (Resolving | Scanning | Advancing, Failed)
                | (Failed, Idle)
        )
    }
}

impl fmt::Display for ReplayPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReplayPhase::Idle => "idle",
            ReplayPhase::Resolving => "resolving",
            ReplayPhase::Scanning => "scanning",
            ReplayPhase::Advancing => "advancing",
            ReplayPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tracks where one pass is for a checkpoint key.
#[derive(Debug, Clone)]
pub struct IndexerState {
    key: String,
    phase: ReplayPhase,
}

impl IndexerState {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            phase: ReplayPhase::Idle,
        }
    }

    pub fn transition(&mut self, to: ReplayPhase) {
        if !self.phase.can_transition(to) {
            warn!(key = %self.key, "Unexpected replay transition {} -> {}", self.phase, to);
        }
        debug!(key = %self.key, "Replay {} -> {}", self.phase, to);
        self.phase = to;
    }
}
