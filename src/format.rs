//! Report output format selection.

use clap::ValueEnum;

/// Output format for the top-N report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines (`{kmer} :\t %{percent} - {count}`)
    #[default]
    Text,
    /// Tab-separated values (kmer\tcount\tpercent)
    Tsv,
    /// JSON object format
    Json,
}
