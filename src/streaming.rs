//! Sequential, record-by-record k-mer counting.
//!
//! This path parses FASTQ records with `rust-bio` on a single thread and
//! never maps the file. It produces the same table as
//! [`CountingEngine`](crate::engine::CountingEngine) for any worker count,
//! which makes it useful as a baseline for large-file comparisons.

use std::{
    fmt::Debug,
    io::{self, BufRead},
    path::Path,
};

use bio::io::fastq;

use crate::{
    aggregator::{KmerAggregator, KmerTable},
    error::EngineError,
    scanner::process_read,
};

#[cfg(feature = "tracing")]
use tracing::{debug, info};

/// Counts k-mers in the FASTQ file at `path` one record at a time.
///
/// # Errors
///
/// Returns [`EngineError::Io`] if the file cannot be opened or a record
/// cannot be parsed, and [`EngineError::InvalidKmerLength`] if `k` is zero.
///
/// # Example
///
/// ```rust,no_run
/// use kmerfreq::streaming::count_kmers_sequential;
///
/// let counts = count_kmers_sequential("reads.fq", 5)?;
/// println!("Found {} unique k-mers", counts.len());
/// # Ok::<(), kmerfreq::error::EngineError>(())
/// ```
pub fn count_kmers_sequential<P>(path: P, k: usize) -> Result<KmerTable, EngineError>
where
    P: AsRef<Path> + Debug,
{
    if k == 0 {
        return Err(EngineError::InvalidKmerLength);
    }
    let path_ref = path.as_ref();
    let io_err = |source| EngineError::Io {
        source,
        path: path_ref.to_path_buf(),
    };

    #[cfg(feature = "tracing")]
    info!(k, path = ?path_ref, "Starting sequential k-mer counting");

    let reader = fastq::Reader::from_file(path_ref)
        .map_err(|e| io_err(io::Error::new(io::ErrorKind::NotFound, e.to_string())))?;

    count_records(reader, k).map_err(io_err)
}

/// Counts k-mers of every record yielded by `reader`.
fn count_records<B: BufRead>(reader: fastq::Reader<B>, k: usize) -> io::Result<KmerTable> {
    let aggregator = KmerAggregator::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        process_read(record.seq(), k, &aggregator);
    }

    #[cfg(feature = "tracing")]
    debug!(unique_kmers = aggregator.len(), "Sequential scan complete");

    Ok(aggregator.into_table())
}
