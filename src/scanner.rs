//! Per-partition FASTQ record scanning.
//!
//! A scanner walks its byte range exactly once, left to right, cycling
//! through the four line roles of a FASTQ record on every newline. Only the
//! bytes of the sequence line are buffered; when the newline ending that
//! line is seen, the buffered read is split into k-mers and handed to the
//! shared [`KmerAggregator`]. Carriage returns in a sequence line are
//! dropped, so CRLF files count the same as LF files.

use crate::{
    aggregator::KmerAggregator, error::ScanError, partition::Partition,
    progress::ProgressTracker,
};

/// Default bound on the length of a single sequence line.
pub const DEFAULT_MAX_READ_LEN: usize = 256;

/// Largest sequence line bound the command line accepts.
pub const MAX_READ_LEN_LIMIT: usize = 1 << 20;

/// Role of a line within its four-line FASTQ record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineRole {
    Identifier,
    Sequence,
    Separator,
    Quality,
}

impl LineRole {
    const fn next(self) -> Self {
        match self {
            Self::Identifier => Self::Sequence,
            Self::Sequence => Self::Separator,
            Self::Separator => Self::Quality,
            Self::Quality => Self::Identifier,
        }
    }
}

/// Adds every k-mer of `line` to `sink`.
///
/// A line of length `L >= k` contributes exactly `L - k + 1` increments; a
/// shorter line contributes none.
pub fn process_read(line: &[u8], k: usize, sink: &KmerAggregator) {
    if k == 0 || line.len() < k {
        return;
    }
    for kmer in line.windows(k) {
        sink.increment(kmer);
    }
}

/// Scans one partition of a FASTQ file.
#[derive(Debug, Clone, Copy)]
pub struct RecordScanner<'a> {
    worker: usize,
    k: usize,
    max_read_len: usize,
    sink: &'a KmerAggregator,
    progress: &'a ProgressTracker,
}

impl<'a> RecordScanner<'a> {
    pub const fn new(
        worker: usize,
        k: usize,
        max_read_len: usize,
        sink: &'a KmerAggregator,
        progress: &'a ProgressTracker,
    ) -> Self {
        Self {
            worker,
            k,
            max_read_len,
            sink,
            progress,
        }
    }

    /// Scans `range` of `bytes`, which must start on a record boundary.
    ///
    /// # Errors
    ///
    /// Returns a [`ScanError`] as soon as a sequence line would grow past
    /// `max_read_len` bytes. Reads emitted before the failure stay counted.
    pub fn scan(&self, bytes: &[u8], range: Partition) -> Result<(), ScanError> {
        let mut role = LineRole::Identifier;
        let mut line = Vec::with_capacity(self.max_read_len.min(DEFAULT_MAX_READ_LEN));

        for (i, &byte) in bytes[range.range()].iter().enumerate() {
            if byte == b'\n' {
                if role == LineRole::Sequence {
                    self.emit(&line);
                    line.clear();
                }
                role = role.next();
                continue;
            }

            // A CRLF line ending leaves a '\r' that is not part of the read.
            if role == LineRole::Sequence && byte != b'\r' {
                if line.len() >= self.max_read_len {
                    return Err(ScanError {
                        worker: self.worker,
                        offset: range.start + i,
                        max: self.max_read_len,
                    });
                }
                line.push(byte);
            }
        }

        Ok(())
    }

    fn emit(&self, line: &[u8]) {
        process_read(line, self.k, self.sink);
        self.progress.record_sequence(line.len() as u64);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scan_all(data: &[u8], k: usize, max: usize) -> (Result<(), ScanError>, KmerAggregator) {
        let agg = KmerAggregator::new();
        let progress = ProgressTracker::new();
        let range = Partition {
            start: 0,
            end: data.len(),
        };
        let result = RecordScanner::new(0, k, max, &agg, &progress).scan(data, range);
        (result, agg)
    }

    #[test]
    fn process_read_counts_windows() {
        let agg = KmerAggregator::new();
        process_read(b"ACGTAC", 3, &agg);
        let table = agg.into_table();
        assert_eq!(table.values().sum::<u64>(), 4);
        assert_eq!(table.get("ACG"), Some(&1));
        assert_eq!(table.get("TAC"), Some(&1));
    }

    #[test]
    fn process_read_short_line_is_noop() {
        let agg = KmerAggregator::new();
        process_read(b"AC", 3, &agg);
        process_read(b"", 1, &agg);
        assert!(agg.is_empty());
    }

    #[test]
    fn process_read_full_length_kmer() {
        let agg = KmerAggregator::new();
        process_read(b"GATTACA", 7, &agg);
        assert_eq!(agg.into_table().get("GATTACA"), Some(&1));
    }

    #[test]
    fn scan_extracts_only_sequence_lines() {
        let data = b"@ACGT\nACGTAC\n+ACGT\nACGTAC\n@r2\nACGTTT\n+\nIIIIII\n";
        let (result, agg) = scan_all(data, 3, DEFAULT_MAX_READ_LEN);
        result.unwrap();

        let table = agg.into_table();
        assert_eq!(table.get("ACG"), Some(&2));
        assert_eq!(table.get("CGT"), Some(&2));
        assert_eq!(table.get("GTA"), Some(&1));
        assert_eq!(table.get("TAC"), Some(&1));
        assert_eq!(table.get("GTT"), Some(&1));
        assert_eq!(table.get("TTT"), Some(&1));
        assert_eq!(table.values().sum::<u64>(), 8);
    }

    #[test]
    fn scan_records_progress() {
        let data = b"@r1\nACGT\n+\nIIII\n@r2\nAC\n+\nII\n";
        let agg = KmerAggregator::new();
        let progress = ProgressTracker::new();
        let range = Partition {
            start: 0,
            end: data.len(),
        };
        RecordScanner::new(0, 2, 16, &agg, &progress)
            .scan(data, range)
            .unwrap();

        let snapshot = progress.snapshot();
        assert_eq!(snapshot.records_processed, 2);
        assert_eq!(snapshot.bases_processed, 6);
    }

    #[test]
    fn scan_handles_missing_trailing_newline() {
        let data = b"@r1\nACGT\n+\nIIII";
        let (result, agg) = scan_all(data, 4, DEFAULT_MAX_READ_LEN);
        result.unwrap();
        assert_eq!(agg.into_table().get("ACGT"), Some(&1));
    }

    #[test]
    fn line_at_bound_is_accepted() {
        let data = b"@r1\nACGTACGT\n+\nIIIIIIII\n";
        let (result, agg) = scan_all(data, 8, 8);
        result.unwrap();
        assert_eq!(agg.len(), 1);
    }

    #[test]
    fn line_over_bound_fails_at_first_extra_byte() {
        let data = b"@r1\nACGTACGTA\n+\nIIIIIIIII\n";
        let (result, _) = scan_all(data, 3, 8);
        let err = result.unwrap_err();
        assert_eq!(
            err,
            ScanError {
                worker: 0,
                offset: 12,
                max: 8
            }
        );
    }

    #[test]
    fn crlf_line_endings_are_not_bases() {
        let data = b"@r1\r\nACGT\r\n+\r\nIIII\r\n@r2\r\nCGT\r\n+\r\nIII\r\n";
        let (result, agg) = scan_all(data, 3, 4);
        result.unwrap();

        let mut keys: Vec<String> = agg.into_table().into_keys().collect();
        keys.sort();
        assert_eq!(keys, ["ACG", "CGT"]);
    }

    #[test]
    fn huge_bound_does_not_preallocate() {
        let data = b"@r1\nACGT\n+\nIIII\n";
        let (result, agg) = scan_all(data, 2, usize::MAX);
        result.unwrap();
        assert_eq!(agg.len(), 3);
    }

    #[test]
    fn scan_respects_range_offsets() {
        let data = b"@r1\nAAAA\n+\nIIII\n@r2\nCCCC\n+\nIIII\n";
        let agg = KmerAggregator::new();
        let progress = ProgressTracker::new();
        let second = Partition {
            start: 16,
            end: data.len(),
        };
        RecordScanner::new(1, 4, 16, &agg, &progress)
            .scan(data, second)
            .unwrap();

        let table = agg.into_table();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("CCCC"), Some(&1));
    }

    #[test]
    fn empty_range_is_a_noop() {
        let (result, agg) = scan_all(b"", 3, 8);
        result.unwrap();
        assert!(agg.is_empty());
    }
}
