//! Fuzz target for `partition`.
//!
//! Arbitrary bytes must either partition into contiguous, marker-aligned
//! ranges or fail with an alignment error; the search never panics.

#![no_main]

use kmerfreq::error::EngineError;
use kmerfreq::partition::{partition, RECORD_START};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (u8, &[u8])| {
    let (n, data) = input;
    let n = usize::from(n % 32) + 1;

    match partition(data, n) {
        Ok(parts) => {
            assert_eq!(parts.len(), n);
            assert_eq!(parts[0].start, 0);
            assert_eq!(parts[n - 1].end, data.len());
            for pair in parts.windows(2) {
                assert_eq!(pair[0].end, pair[1].start, "gap or overlap");
            }
            for p in &parts[1..] {
                assert!(
                    p.start == 0 || data[p.start] == RECORD_START,
                    "boundary {} is not a record start",
                    p.start
                );
            }
        }
        Err(EngineError::Alignment { index, target }) => {
            assert!(index >= 1 && index < n);
            assert!(target <= data.len());
        }
        Err(other) => panic!("unexpected error: {other}"),
    }
});
