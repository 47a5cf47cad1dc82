//! Engine types
//!
//! Configuration and statistics for the sync engine.

/// Configuration for sync operation
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Whether to emit STATE after each page of an incremental stream
    pub emit_state_per_page: bool,
    /// Maximum records per stream (0 = unlimited)
    pub max_records: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            emit_state_per_page: true,
            max_records: 0,
        }
    }
}

impl SyncConfig {
    /// Create a new sync config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit state after each page
    #[must_use]
    pub fn with_state_per_page(mut self, emit: bool) -> Self {
        self.emit_state_per_page = emit;
        self
    }

    /// Set max records
    #[must_use]
    pub fn with_max_records(mut self, max: usize) -> Self {
        self.max_records = max;
        self
    }

    /// Whether `count` records exhausts the per-stream limit
    pub fn limit_reached(&self, count: usize) -> bool {
        self.max_records > 0 && count >= self.max_records
    }
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Total records synced
    pub records_synced: usize,
    /// Total pages fetched
    pub pages_fetched: usize,
    /// Total streams synced
    pub streams_synced: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add records
    pub fn add_records(&mut self, count: usize) {
        self.records_synced += count;
    }

    /// Add a page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Add a stream
    pub fn add_stream(&mut self) {
        self.streams_synced += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }

    /// Fold another run's counters into these
    pub fn merge(&mut self, other: &SyncStats) {
        self.records_synced += other.records_synced;
        self.pages_fetched += other.pages_fetched;
        self.streams_synced += other.streams_synced;
        self.duration_ms += other.duration_ms;
    }
}
