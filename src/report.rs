//! Top-N frequency report.
//!
//! The count table is inverted into entries ordered by descending count and
//! each entry's share of all k-mer occurrences is computed.

use rayon::slice::ParallelSliceMut;
use serde::Serialize;
use std::io::Write;

use crate::{aggregator::KmerTable, error::ReportError, format::OutputFormat};

/// One reported k-mer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub kmer: String,
    pub count: u64,
    /// Share of `count` in the total number of occurrences, in percent.
    pub percent: f64,
}

/// The most frequent k-mers of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Sum of all k-mer counts.
    pub total: u64,
    /// Number of distinct k-mers.
    pub unique: usize,
    pub entries: Vec<ReportEntry>,
}

impl Report {
    /// Builds a report of the `top` most frequent k-mers in `counts`.
    ///
    /// Equal counts are ordered by k-mer so output is deterministic.
    pub fn from_counts(counts: &KmerTable, top: usize) -> Self {
        let total: u64 = counts.values().sum();

        let mut ranked: Vec<(&str, u64)> =
            counts.iter().map(|(k, &c)| (k.as_str(), c)).collect();
        ranked.par_sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let entries = ranked
            .into_iter()
            .take(top)
            .map(|(kmer, count)| ReportEntry {
                kmer: kmer.to_string(),
                count,
                percent: percent(count, total),
            })
            .collect();

        Self {
            total,
            unique: counts.len(),
            entries,
        }
    }

    /// Writes the report to `out` in `format`.
    pub fn write<W: Write>(&self, mut out: W, format: OutputFormat) -> Result<(), ReportError> {
        match format {
            OutputFormat::Text => {
                writeln!(out, "# total kmer count: {}", self.total)?;
                writeln!(out, "# unique kmers: {}", self.unique)?;
                writeln!(out, "# showing top {} frequent kmers", self.entries.len())?;
                for e in &self.entries {
                    writeln!(out, "{} :\t %{:.2} - {}", e.kmer, e.percent, e.count)?;
                }
            }
            OutputFormat::Tsv => {
                for e in &self.entries {
                    writeln!(out, "{}\t{}\t{:.4}", e.kmer, e.count, e.percent)?;
                }
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut out, self)?;
                writeln!(out)?;
            }
        }
        out.flush()?;
        Ok(())
    }
}

fn percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    100.0 * count as f64 / total as f64
}
