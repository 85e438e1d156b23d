use std::{io::stdout, process};

use clap::Parser;
use colored::Colorize;
use kmerfreq::{
    check::FileMetadata,
    cli::Args,
    config::Config,
    error::{EngineError, KmerFreqError},
    report::Report,
};

/// Exit status for input the tool cannot use.
const EXIT_BAD_INPUT: i32 = 2;
/// Exit status for failures during the scan itself.
const EXIT_FAILURE: i32 = 1;

fn main() {
    let args = Args::parse();

    #[cfg(feature = "tracing")]
    init_tracing(args.verbose);

    if let Err(e) = run(&args) {
        let (label, code) = classify(&e);
        eprintln!("{}\n {}", label.blue().bold(), e.to_string().blue());
        process::exit(code);
    }
}

fn run(args: &Args) -> Result<(), KmerFreqError> {
    let config = Config::new(args)?;
    let quiet = args.quiet;

    if !quiet {
        eprintln!("{}: `{}`", "checking file".bold(), config.path.display());
    }
    let meta = FileMetadata::inspect(&config.path)?;
    if !quiet {
        eprintln!("{}: {}", "line count".bold(), meta.line_count.to_string().blue());
        eprintln!("{}: {}", "read length".bold(), meta.read_len.to_string().blue());
        eprintln!("{}: {}", "k-length".bold(), config.k.to_string().blue().bold());
        eprintln!("{}: {}", "workers".bold(), config.workers.to_string().blue());
        eprintln!();
    }

    let outcome = config.engine()?.run(&config.path, config.k, &meta)?;

    if !quiet {
        eprintln!(
            "{}: {:.3} secs",
            "time spent".bold(),
            outcome.elapsed.as_secs_f64()
        );
        eprintln!();
    }

    Report::from_counts(&outcome.counts, config.top).write(stdout().lock(), config.format)?;
    Ok(())
}

fn classify(e: &KmerFreqError) -> (&'static str, i32) {
    match e {
        KmerFreqError::Config(_) => ("Problem parsing arguments:", EXIT_BAD_INPUT),
        KmerFreqError::Check(_) => ("Bad input file:", EXIT_BAD_INPUT),
        KmerFreqError::Engine(err) if err.is_input_error() => {
            ("Bad input file:", EXIT_BAD_INPUT)
        }
        KmerFreqError::Engine(EngineError::Scan(_)) => ("Scan failed:", EXIT_FAILURE),
        KmerFreqError::Engine(_) | KmerFreqError::Report(_) => {
            ("Application error:", EXIT_FAILURE)
        }
    }
}

#[cfg(feature = "tracing")]
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}
