//! Error types for kmerfreq.
//!
//! Each stage of a counting run has its own strongly-typed error so callers
//! can tell a bad input file apart from an internal bound violation.

use std::path::PathBuf;
use thiserror::Error;

/// A worker's sequence line outgrew its bounded buffer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("worker {worker}: sequence line at byte {offset} exceeds the maximum read length of {max}")]
pub struct ScanError {
    /// Index of the partition (and worker) that raised the error.
    pub worker: usize,
    /// Absolute file offset of the byte that did not fit.
    pub offset: usize,
    /// The configured line bound.
    pub max: usize,
}

/// Errors raised by the counting engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The input file could not be opened or memory-mapped.
    #[error("failed to map file '{path}': {source}")]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// No record start was found walking back from a partition target.
    #[error("no FASTQ record start found at or before byte {target} (partition {index})")]
    Alignment { index: usize, target: usize },

    /// A worker failed while scanning its partition.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// `k` is longer than the reads of the file.
    #[error("k-mer size {k} is larger than the read length {read_len}")]
    KmerTooLong { k: usize, read_len: usize },

    /// `k` must be at least one.
    #[error("k-mer size must be at least 1")]
    InvalidKmerLength,

    /// At least one worker is needed.
    #[error("worker count must be at least 1")]
    InvalidWorkerCount,

    /// The worker pool could not be started.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl EngineError {
    /// Returns `true` when the failure is attributable to the input file or
    /// the requested parameters rather than to a scan-time bound violation.
    pub const fn is_input_error(&self) -> bool {
        !matches!(self, Self::Scan(_) | Self::ThreadPool(_))
    }
}

/// Errors raised while checking a FASTQ file before counting.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The file could not be opened or read.
    #[error("failed to read file '{path}': {source}")]
    Open {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// The file contains no data.
    #[error("file '{path}' is empty")]
    EmptyFile { path: PathBuf },

    /// A FASTQ file has four lines per record.
    #[error("bad FASTQ file '{path}': line count {lines} is not a multiple of 4")]
    LineCount { lines: usize, path: PathBuf },

    /// The first record has no sequence line.
    #[error("bad FASTQ format in '{path}': first record has no sequence line")]
    MissingSequence { path: PathBuf },
}

/// Errors raised while rendering a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to write output.
    #[error("unable to write output: {0}")]
    Write(#[from] std::io::Error),

    /// Failed to serialize JSON output.
    #[error("unable to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level error for the command-line tool.
#[derive(Debug, Error)]
pub enum KmerFreqError {
    #[error(transparent)]
    Check(#[from] CheckError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Report(#[from] ReportError),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),
}
