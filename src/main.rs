use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::Level;

mod archive;
mod keyspace;
mod search;

use keyspace::{Alphabet, DEFAULT_ALPHABET};
use search::config::DEFAULT_LENGTH;
use search::{CancellationToken, ParallelConfig, SearchConfig, SearchOutcome, crack_archive};

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "zipsweep")]
#[command(about = "zipsweep - parallel zip password recovery")]
#[command(version)]
#[command(arg_required_else_help = true)]
struct Args {
    /// Path to the encrypted zip archive
    archive: PathBuf,

    // --- Keyspace ---
    /// Symbols a password may contain, in enumeration order
    #[arg(long, short = 'c', default_value = DEFAULT_ALPHABET)]
    charset: String,
    /// Exact password length
    #[arg(long, short = 'l', default_value_t = DEFAULT_LENGTH)]
    length: usize,

    // --- Parallelism ---
    /// Number of worker threads (defaults to the number of CPUs)
    #[arg(long, short = 'j')]
    workers: Option<usize>,
    /// Milliseconds to wait for workers to stop once the outcome is known
    #[arg(long, default_value = "2000")]
    grace_period_ms: u64,
    /// Give up after this many seconds
    #[arg(long)]
    timeout: Option<u64>,
    /// Seconds between progress log lines
    #[arg(long, default_value = "5")]
    progress_interval: u64,

    // --- Output ---
    /// Directory the decrypted entry is written to
    #[arg(long, short = 'o', default_value = ".")]
    output_dir: PathBuf,
    /// Only report the password, do not write the decrypted entry
    #[arg(long)]
    no_extract: bool,
    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

/// Process exit codes for each kind of run.
mod exit {
    pub const FOUND: u8 = 0;
    pub const NOT_FOUND: u8 = 1;
    pub const ERROR: u8 = 2;
    pub const INVALID_CONFIG: u8 = 3;
    pub const CANCELLED: u8 = 130;
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let alphabet = match Alphabet::new(&args.charset) {
        Ok(alphabet) => alphabet,
        Err(e) => {
            eprintln!("Invalid charset: {}", e);
            return ExitCode::from(exit::INVALID_CONFIG);
        }
    };

    let search_config = SearchConfig::default()
        .with_alphabet(alphabet)
        .with_length(args.length)
        .with_extract_dir((!args.no_extract).then(|| args.output_dir.clone()));

    let parallel_config = ParallelConfig::default()
        .with_workers(args.workers.unwrap_or_else(num_cpus::get))
        .with_grace_period(Duration::from_millis(args.grace_period_ms))
        .with_timeout_option(args.timeout.map(Duration::from_secs))
        .with_progress_interval(Duration::from_secs(args.progress_interval.max(1)));

    let cancel = CancellationToken::new();
    let cancel_for_handler = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        if cancel_for_handler.cancel() {
            eprintln!("\nInterrupted, stopping workers...");
        }
    }) {
        tracing::warn!(error = %e, "could not install Ctrl-C handler");
    }

    println!("Archive: {}", args.archive.display());
    println!("Charset: {}", search_config.alphabet);
    println!("Length: {}", search_config.length);
    println!("Workers: {}", parallel_config.num_workers);

    let report = match crack_archive(&args.archive, &search_config, &parallel_config, &cancel) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Invalid search configuration: {}", e);
            return ExitCode::from(exit::INVALID_CONFIG);
        }
    };

    println!();
    print!("{}", report);
    if args.verbose {
        println!("\nSearch Statistics:");
        print!("{}", report.statistics.format_summary());
    }

    ExitCode::from(match report.outcome {
        SearchOutcome::Found(_) => exit::FOUND,
        SearchOutcome::NotFound => exit::NOT_FOUND,
        SearchOutcome::Cancelled(_) => exit::CANCELLED,
        SearchOutcome::Error(_) => exit::ERROR,
    })
}
