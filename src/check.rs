//! Up-front FASTQ sanity check.
//!
//! [`FileMetadata::inspect`] verifies that a file looks like four-line
//! FASTQ and measures the length of its first read. The result is passed
//! explicitly to [`CountingEngine::run`](crate::engine::CountingEngine::run),
//! which uses the read length to reject oversized k-mers before mapping.

use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use crate::error::CheckError;

#[cfg(feature = "tracing")]
use tracing::info;

/// Facts about a FASTQ file gathered before counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMetadata {
    /// Number of lines, counting a final unterminated line.
    pub line_count: usize,
    /// Length of the first record's sequence line.
    pub read_len: usize,
}

impl FileMetadata {
    /// Inspects the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckError`] if the file cannot be read, is empty, has a
    /// line count that is not a multiple of four, or has no sequence line
    /// in its first record.
    pub fn inspect<P: AsRef<Path>>(path: P) -> Result<Self, CheckError> {
        let path = path.as_ref();
        let open_err = |source| CheckError::Open {
            source,
            path: path.to_path_buf(),
        };

        let file = File::open(path).map_err(open_err)?;
        let line_count = count_lines(BufReader::new(file)).map_err(open_err)?;

        if line_count == 0 {
            return Err(CheckError::EmptyFile {
                path: path.to_path_buf(),
            });
        }
        if line_count % 4 != 0 {
            return Err(CheckError::LineCount {
                lines: line_count,
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path).map_err(open_err)?;
        let read_len = first_read_len(BufReader::new(file))
            .map_err(open_err)?
            .ok_or_else(|| CheckError::MissingSequence {
                path: path.to_path_buf(),
            })?;

        #[cfg(feature = "tracing")]
        info!(path = ?path, line_count, read_len, "FASTQ file check passed");

        Ok(Self {
            line_count,
            read_len,
        })
    }

    /// Number of four-line records in the file.
    pub const fn records(&self) -> usize {
        self.line_count / 4
    }
}

fn count_lines<R: Read>(mut reader: BufReader<R>) -> std::io::Result<usize> {
    let mut lines = 0;
    let mut last = b'\n';
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            break;
        }
        lines += buf.iter().filter(|&&b| b == b'\n').count();
        last = buf[buf.len() - 1];
        let consumed = buf.len();
        reader.consume(consumed);
    }
    if last != b'\n' {
        lines += 1;
    }
    Ok(lines)
}

/// Length of the second line, without its line terminator.
fn first_read_len<R: Read>(mut reader: BufReader<R>) -> std::io::Result<Option<usize>> {
    let mut line = Vec::new();
    reader.read_until(b'\n', &mut line)?;
    line.clear();
    if reader.read_until(b'\n', &mut line)? == 0 {
        return Ok(None);
    }
    if line.last() == Some(&b'\n') {
        line.pop();
    }
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    Ok(Some(line.len()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn inspect_well_formed_file() {
        let file = temp_file(b"@r1\nACGTAC\n+\nIIIIII\n@r2\nACGTTT\n+\nIIIIII\n");
        let meta = FileMetadata::inspect(file.path()).unwrap();
        assert_eq!(meta.line_count, 8);
        assert_eq!(meta.records(), 2);
        assert_eq!(meta.read_len, 6);
    }

    #[test]
    fn inspect_counts_unterminated_last_line() {
        let file = temp_file(b"@r1\nACGT\n+\nIIII");
        let meta = FileMetadata::inspect(file.path()).unwrap();
        assert_eq!(meta.line_count, 4);
        assert_eq!(meta.read_len, 4);
    }

    #[test]
    fn inspect_ignores_carriage_return_in_read_length() {
        let file = temp_file(b"@r1\r\nACGTAC\r\n+\r\nIIIIII\r\n");
        let meta = FileMetadata::inspect(file.path()).unwrap();
        assert_eq!(meta.line_count, 4);
        assert_eq!(meta.read_len, 6);
    }

    #[test]
    fn inspect_rejects_bad_line_count() {
        let file = temp_file(b"@r1\nACGT\n+\n");
        let err = FileMetadata::inspect(file.path()).unwrap_err();
        assert!(matches!(err, CheckError::LineCount { lines: 3, .. }));
    }

    #[test]
    fn inspect_rejects_empty_file() {
        let file = temp_file(b"");
        let err = FileMetadata::inspect(file.path()).unwrap_err();
        assert!(matches!(err, CheckError::EmptyFile { .. }));
    }

    #[test]
    fn inspect_rejects_missing_file() {
        let err = FileMetadata::inspect("/nonexistent/reads.fq").unwrap_err();
        assert!(matches!(err, CheckError::Open { .. }));
    }
}
