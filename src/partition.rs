//! Record-aligned partitioning of a mapped FASTQ file.
//!
//! The file is cut into `n` contiguous byte ranges of roughly equal size.
//! Each interior boundary is moved backward from its target offset until it
//! lands on the `'@'` that opens a FASTQ record, so a record is never split
//! between two workers.

use std::ops::Range;

use crate::error::EngineError;

#[cfg(feature = "tracing")]
use tracing::debug;

/// Byte that opens every FASTQ record.
pub const RECORD_START: u8 = b'@';

/// A contiguous `[start, end)` byte range assigned to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub start: usize,
    pub end: usize,
}

impl Partition {
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Splits `bytes` into `n` record-aligned partitions.
///
/// The first partition always starts at 0 and the last always ends at
/// `bytes.len()`. Adjacent partitions share their boundary, and every
/// interior boundary is a record-start `'@'`. Partitions may be empty when
/// records are long relative to `bytes.len() / n`.
///
/// # Errors
///
/// Returns [`EngineError::Alignment`] if the backward search reaches the
/// beginning of the file without finding a record start, and
/// [`EngineError::InvalidWorkerCount`] if `n` is zero.
pub fn partition(bytes: &[u8], n: usize) -> Result<Vec<Partition>, EngineError> {
    if n == 0 {
        return Err(EngineError::InvalidWorkerCount);
    }

    let len = bytes.len();
    let step = len / n;

    let mut boundaries = Vec::with_capacity(n + 1);
    boundaries.push(0);
    for index in 1..n {
        let target = index * step;
        let boundary =
            align_backward(bytes, target).ok_or(EngineError::Alignment { index, target })?;

        #[cfg(feature = "tracing")]
        debug!(index, target, boundary, "aligned partition boundary");

        boundaries.push(boundary);
    }
    boundaries.push(len);

    Ok(boundaries
        .windows(2)
        .map(|w| Partition {
            start: w[0],
            end: w[1],
        })
        .collect())
}

/// Walks backward from `target` to the nearest record start at or before it.
///
/// Returns `None` instead of running past offset 0. An empty input aligns
/// trivially to 0.
fn align_backward(bytes: &[u8], target: usize) -> Option<usize> {
    if bytes.is_empty() {
        return Some(0);
    }
    let mut offset = target.min(bytes.len() - 1);
    loop {
        if is_record_start(bytes, offset) {
            return Some(offset);
        }
        offset = offset.checked_sub(1)?;
    }
}

/// A record start is an `'@'` opening a line whose record has a `'+'`
/// separator two lines below.
///
/// Quality strings may begin with `'@'` too; checking the separator keeps
/// those lines from being taken for identifiers.
pub(crate) fn is_record_start(bytes: &[u8], offset: usize) -> bool {
    if bytes[offset] != RECORD_START {
        return false;
    }
    if offset > 0 && bytes[offset - 1] != b'\n' {
        return false;
    }
    nth_line_start(bytes, offset, 2).is_some_and(|sep| bytes[sep] == b'+')
}

/// Offset of the first byte of the `n`th line after the one at `offset`.
fn nth_line_start(bytes: &[u8], offset: usize, n: usize) -> Option<usize> {
    let mut pos = offset;
    for _ in 0..n {
        pos += bytes[pos..].iter().position(|&b| b == b'\n')? + 1;
    }
    (pos < bytes.len()).then_some(pos)
}
