//! K-mer counting over a memory-mapped FASTQ file.
//!
//! A run maps the file, cuts it into record-aligned partitions, scans every
//! partition on its own worker and collects the shared counts once all
//! workers have joined. The result does not depend on the worker count.

use std::{
    fmt::Debug,
    path::Path,
    time::{Duration, Instant},
};

use rayon::prelude::*;

use crate::{
    aggregator::{KmerAggregator, KmerTable},
    check::FileMetadata,
    error::{EngineError, KmerFreqError, ScanError},
    mmap::MappedFastq,
    partition::partition,
    progress::{Progress, ProgressTracker},
    scanner::{RecordScanner, DEFAULT_MAX_READ_LEN},
};

#[cfg(feature = "tracing")]
use tracing::{debug, info, info_span};

/// Result of a successful counting run.
#[derive(Debug, Clone)]
pub struct CountOutcome {
    /// Occurrences of every k-mer seen in the file.
    pub counts: KmerTable,
    /// Wall-clock time of the partition and scan phase.
    pub elapsed: Duration,
    /// Records and bases processed across all workers.
    pub progress: Progress,
}

/// Runs concurrent, record-aligned k-mer counting.
///
/// # Example
///
/// ```rust,no_run
/// use kmerfreq::check::FileMetadata;
/// use kmerfreq::engine::CountingEngine;
///
/// let meta = FileMetadata::inspect("reads.fq")?;
/// let outcome = CountingEngine::new(4)?.run("reads.fq", 21, &meta)?;
/// println!("{} distinct k-mers in {:?}", outcome.counts.len(), outcome.elapsed);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountingEngine {
    workers: usize,
    max_read_len: usize,
}

impl Default for CountingEngine {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            max_read_len: DEFAULT_MAX_READ_LEN,
        }
    }
}

impl CountingEngine {
    /// Creates an engine that scans with `workers` partitions.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidWorkerCount`] if `workers` is zero.
    pub fn new(workers: usize) -> Result<Self, EngineError> {
        if workers == 0 {
            return Err(EngineError::InvalidWorkerCount);
        }
        Ok(Self {
            workers,
            max_read_len: DEFAULT_MAX_READ_LEN,
        })
    }

    /// Sets the largest sequence line a worker will buffer.
    #[must_use]
    pub const fn max_read_len(mut self, max_read_len: usize) -> Self {
        self.max_read_len = max_read_len;
        self
    }

    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Counts the k-mers of the FASTQ file at `path`.
    ///
    /// `meta` comes from a prior [`FileMetadata::inspect`] of the same file.
    /// Every call starts from an empty table.
    ///
    /// # Errors
    ///
    /// Fails before any worker starts if `k` is zero or longer than
    /// `meta.read_len`, if the file cannot be mapped, or if partitions cannot
    /// be aligned. If any worker fails, the error of the lowest-numbered
    /// failing partition is returned and no counts are.
    pub fn run<P>(
        &self,
        path: P,
        k: usize,
        meta: &FileMetadata,
    ) -> Result<CountOutcome, EngineError>
    where
        P: AsRef<Path> + Debug,
    {
        if k == 0 {
            return Err(EngineError::InvalidKmerLength);
        }
        if k > meta.read_len {
            return Err(EngineError::KmerTooLong {
                k,
                read_len: meta.read_len,
            });
        }

        #[cfg(feature = "tracing")]
        info!(path = ?path, k, workers = self.workers, "Starting k-mer counting");

        let source = MappedFastq::open(&path)?;
        let outcome = self.count_bytes(source.as_bytes(), k)?;

        #[cfg(feature = "tracing")]
        info!(
            unique_kmers = outcome.counts.len(),
            records = outcome.progress.records_processed,
            elapsed = ?outcome.elapsed,
            "K-mer counting complete"
        );

        Ok(outcome)
    }

    /// Counts the k-mers of FASTQ data already in memory.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run), minus the file and precondition checks.
    pub fn count_bytes(&self, bytes: &[u8], k: usize) -> Result<CountOutcome, EngineError> {
        if k == 0 {
            return Err(EngineError::InvalidKmerLength);
        }

        let start = Instant::now();
        let partitions = partition(bytes, self.workers)?;

        let aggregator = KmerAggregator::new();
        let progress = ProgressTracker::new();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()?;

        #[cfg(feature = "tracing")]
        let _scan_span = info_span!("scan", partitions = partitions.len()).entered();

        let results: Vec<Result<(), ScanError>> = pool.install(|| {
            partitions
                .par_iter()
                .enumerate()
                .map(|(worker, &range)| {
                    let scanner =
                        RecordScanner::new(worker, k, self.max_read_len, &aggregator, &progress);
                    let result = scanner.scan(bytes, range);

                    #[cfg(feature = "tracing")]
                    debug!(
                        worker,
                        start = range.start,
                        end = range.end,
                        ok = result.is_ok(),
                        "worker finished"
                    );

                    result
                })
                .collect()
        });

        // First failure in partition order, independent of completion order.
        results.into_iter().collect::<Result<(), ScanError>>()?;

        let elapsed = start.elapsed();
        Ok(CountOutcome {
            counts: aggregator.into_table(),
            elapsed,
            progress: progress.snapshot(),
        })
    }
}

/// Number of workers used when none is configured.
pub fn default_workers() -> usize {
    num_cpus::get().max(1)
}

/// Checks the file at `path` and counts its k-mers with default settings.
///
/// # Errors
///
/// Returns [`KmerFreqError::Check`] if the file is not four-line FASTQ and
/// [`KmerFreqError::Engine`] if counting fails.
pub fn count_kmers<P>(path: P, k: usize) -> Result<KmerTable, KmerFreqError>
where
    P: AsRef<Path> + Debug,
{
    let meta = FileMetadata::inspect(&path)?;
    let outcome = CountingEngine::default().run(path, k, &meta)?;
    Ok(outcome.counts)
}
