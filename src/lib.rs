//! Concurrent k-mer frequency counting for FASTQ files.
//!
//! The input file is memory-mapped and cut into record-aligned byte ranges,
//! one per worker. Each worker walks its range with a four-line state
//! machine, extracts the sequence line of every record and adds its k-mers
//! to a shared, sharded count table. The counts are identical for any
//! number of workers.
//!
//! # Example
//!
//! ```rust,no_run
//! use kmerfreq::{check::FileMetadata, engine::CountingEngine, report::Report};
//!
//! let meta = FileMetadata::inspect("reads.fq")?;
//! let outcome = CountingEngine::new(8)?.run("reads.fq", 5, &meta)?;
//! let report = Report::from_counts(&outcome.counts, 10);
//! for entry in &report.entries {
//!     println!("{} {} {:.2}%", entry.kmer, entry.count, entry.percent);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod aggregator;
pub mod check;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod mmap;
pub mod partition;
pub mod progress;
pub mod report;
pub mod scanner;
pub mod streaming;

pub use aggregator::{KmerAggregator, KmerTable};
pub use engine::{count_kmers, CountOutcome, CountingEngine};
pub use error::{EngineError, KmerFreqError, ScanError};
