use std::fmt;

/// Inclusive block interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub start: u64,
    pub end: u64,
}

impl BlockRange {
    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }

    pub fn contains(&self, block_number: u64) -> bool {
        (self.start..=self.end).contains(&block_number)
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Tally of what one scan did with the logs it matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub matched: usize,
    pub inserted: usize,
    pub duplicates: usize,
    /// Logs that could not be decoded and were skipped.
    pub skipped: usize,
    /// Records the store refused to write.
    pub store_failures: usize,
}

impl ScanReport {
    pub fn merge(&mut self, other: &ScanReport) {
        self.matched += other.matched;
        self.inserted += other.inserted;
        self.duplicates += other.duplicates;
        self.skipped += other.skipped;
        self.store_failures += other.store_failures;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The checkpoint already covers the safe head.
    UpToDate { checkpoint: u64, safe_head: u64 },
    /// The range was scanned and the checkpoint moved to `range.end`.
    Advanced { range: BlockRange, report: ScanReport },
}
