//! Validated run configuration built from command-line arguments.

use std::{fs, path::PathBuf};

use crate::{
    cli::{Args, OutputFormat},
    engine::CountingEngine,
    error::{EngineError, KmerFreqError},
    scanner::MAX_READ_LEN_LIMIT,
};

/// Validated run settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub path: PathBuf,
    pub k: usize,
    pub top: usize,
    pub workers: usize,
    pub max_read_len: usize,
    pub format: OutputFormat,
}

impl Config {
    /// Builds a `Config` from parsed arguments, checking that the input exists.
    ///
    /// Zero values never get here; the argument parser rejects them.
    ///
    /// # Errors
    ///
    /// Returns [`KmerFreqError::Config`] if the read length bound is above
    /// [`MAX_READ_LEN_LIMIT`] or the input path cannot be read.
    pub fn new(args: &Args) -> Result<Self, KmerFreqError> {
        let path = args
            .input()
            .ok_or_else(|| KmerFreqError::Config("no input file given".into()))?;
        if args.max_read_len > MAX_READ_LEN_LIMIT {
            return Err(KmerFreqError::Config(format!(
                "maximum read length {} exceeds the limit of {MAX_READ_LEN_LIMIT}",
                args.max_read_len
            )));
        }
        if let Err(e) = fs::metadata(path) {
            return Err(KmerFreqError::Config(format!(
                "issue with file path '{}': {e}",
                path.display()
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
            k: args.k,
            top: args.top,
            workers: args.workers,
            max_read_len: args.max_read_len,
            format: args.format,
        })
    }

    /// The counting engine described by this configuration.
    pub fn engine(&self) -> Result<CountingEngine, EngineError> {
        Ok(CountingEngine::new(self.workers)?.max_read_len(self.max_read_len))
    }
}
