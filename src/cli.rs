//! Command-line interface definition.

use clap::Parser;
use std::path::{Path, PathBuf};

pub use crate::format::OutputFormat;
use crate::{engine::default_workers, scanner::DEFAULT_MAX_READ_LEN};

/// Reports the most frequent k-mers in the sequence reads of a FASTQ file.
#[derive(Parser, Debug)]
#[command(name = "kmerfreq")]
#[command(version, author, about, long_about = None)]
pub struct Args {
    /// Path to a FASTQ file (4 lines per record, uncompressed)
    #[arg(required_unless_present = "filename")]
    pub path: Option<PathBuf>,

    /// Path to a FASTQ file, given as a flag instead of positionally
    #[arg(long, value_name = "PATH", conflicts_with = "path")]
    pub filename: Option<PathBuf>,

    /// K-mer length
    #[arg(short, long = "kmersize", visible_alias = "kmer-size", value_parser = parse_positive)]
    pub k: usize,

    /// Number of most frequent k-mers to report
    #[arg(short, long = "topcount", visible_alias = "top", default_value = "25")]
    pub top: usize,

    /// Number of worker partitions (defaults to the number of CPUs)
    #[arg(short, long, default_value_t = default_workers(), value_parser = parse_positive)]
    pub workers: usize,

    /// Longest sequence line a worker accepts
    #[arg(long, default_value_t = DEFAULT_MAX_READ_LEN, value_parser = parse_positive)]
    pub max_read_len: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Suppress informational output (only output the report)
    #[arg(short, long)]
    pub quiet: bool,

    /// Log run details to stderr (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// The input file, whichever way it was given.
    pub fn input(&self) -> Option<&Path> {
        self.path.as_deref().or(self.filename.as_deref())
    }
}

fn parse_positive(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if n == 0 {
        return Err("value must be at least 1".to_string());
    }
    Ok(n)
}
