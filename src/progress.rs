//! Progress tracking for counting runs.
//!
//! Every scanner records each sequence line it hands to the aggregator, so
//! the totals are available once the run completes, or at any point during
//! it from another thread.

use std::sync::atomic::{AtomicU64, Ordering};

/// Progress snapshot of a counting run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Number of FASTQ records whose sequence line was processed.
    pub records_processed: u64,
    /// Total number of sequence bases processed.
    pub bases_processed: u64,
}

/// Thread-safe progress tracker using atomic counters.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    records: AtomicU64,
    bases: AtomicU64,
}

impl ProgressTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: AtomicU64::new(0),
            bases: AtomicU64::new(0),
        }
    }

    /// Record that one sequence line of `bases` bytes has been processed.
    pub fn record_sequence(&self, bases: u64) {
        self.records.fetch_add(1, Ordering::Relaxed);
        self.bases.fetch_add(bases, Ordering::Relaxed);
    }

    /// Get a snapshot of the current progress.
    ///
    /// While workers are running the two counters may be observed a single
    /// record apart.
    pub fn snapshot(&self) -> Progress {
        Progress {
            records_processed: self.records.load(Ordering::Relaxed),
            bases_processed: self.bases.load(Ordering::Relaxed),
        }
    }
}
