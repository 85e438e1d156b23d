//! Memory-mapped FASTQ input.
//!
//! The whole file is mapped read-only so that every worker can address its
//! own byte range without copying. The mapping is released when the
//! [`MappedFastq`] is dropped, on success and failure paths alike.
//!
//! # Example
//!
//! ```rust,no_run
//! use kmerfreq::mmap::MappedFastq;
//!
//! let source = MappedFastq::open("reads.fq")?;
//! assert_eq!(source.at(0), b'@');
//! # Ok::<(), kmerfreq::error::EngineError>(())
//! ```
//!
//! # Safety
//!
//! Memory mapping relies on the underlying file not being modified while
//! the mapping is active. Modifying a mapped file leads to undefined behavior.

use memmap2::Mmap;
use std::{fs::File, path::Path};

use crate::error::EngineError;

/// A read-only, memory-mapped FASTQ file.
pub struct MappedFastq {
    mmap: Option<Mmap>,
}

impl MappedFastq {
    /// Open and memory-map a FASTQ file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Io`] if the file cannot be opened or mapped.
    #[allow(unsafe_code)]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let io_err = |source| EngineError::Io {
            source,
            path: path.to_path_buf(),
        };

        let file = File::open(path).map_err(io_err)?;
        let len = file.metadata().map_err(io_err)?.len();

        // Zero-length files cannot be mapped on every platform.
        if len == 0 {
            return Ok(Self { mmap: None });
        }

        // SAFETY: We rely on the file not being modified while mapped.
        let mmap = unsafe { Mmap::map(&file).map_err(io_err)? };
        Ok(Self { mmap: Some(mmap) })
    }

    /// The mapped file contents.
    pub fn as_bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or_default()
    }

    /// The byte at `offset`; `offset` must be below [`len`](Self::len).
    pub fn at(&self, offset: usize) -> u8 {
        self.as_bytes()[offset]
    }

    /// Length of the mapped file in bytes.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn mapped_fastq_open_and_read() {
        let mut temp = NamedTempFile::new().unwrap();
        write!(temp, "@r1\nACGT\n+\nIIII\n").unwrap();
        temp.flush().unwrap();

        let source = MappedFastq::open(temp.path()).unwrap();
        assert_eq!(source.len(), 16);
        assert_eq!(source.at(0), b'@');
        assert_eq!(source.at(4), b'A');
        assert!(source.as_bytes().ends_with(b"IIII\n"));
    }

    #[test]
    fn mapped_fastq_empty_file() {
        let temp = NamedTempFile::new().unwrap();
        let source = MappedFastq::open(temp.path()).unwrap();
        assert!(source.is_empty());
        assert!(source.as_bytes().is_empty());
    }

    #[test]
    fn mapped_fastq_missing_file() {
        let result = MappedFastq::open("/nonexistent/reads.fq");
        assert!(matches!(result, Err(EngineError::Io { .. })));
    }
}
