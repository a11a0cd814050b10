//! Rank the email domains of a CSV upload by distinct address count.
//!
//! ## Usage
//!
//! ```bash
//! # Table of every domain, most addresses first
//! rank-groups users.csv
//!
//! # Top 10, ties by name, key column "address", JSON output
//! rank-groups users.csv --column address --top 10 --sorted --json
//!
//! # Read from stdin, show skipped rows
//! RUST_LOG=warn rank-groups - < users.csv
//! ```

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use rankkit::ingest::{IngestConfig, IngestError, IngestReport, ingest, ingest_file};

#[derive(Parser)]
#[command(name = "rank-groups")]
#[command(about = "Rank email domains by number of distinct addresses")]
#[command(version)]
struct Cli {
    /// CSV file to read, or `-` for stdin
    file: PathBuf,

    /// Header name of the email column
    #[arg(short, long, default_value = "email")]
    column: String,

    /// Field delimiter
    #[arg(short, long, default_value_t = ',')]
    delimiter: char,

    /// Only print the first N domains
    #[arg(short, long)]
    top: Option<usize>,

    /// Order domains with equal counts by name
    #[arg(short, long)]
    sorted: bool,

    /// Treat domains case-insensitively
    #[arg(short, long)]
    lowercase_domain: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = IngestConfig::builder()
        .column(cli.column)
        .delimiter(cli.delimiter)
        .sorted_ties(cli.sorted)
        .lowercase_domain(cli.lowercase_domain)
        .try_build()?;

    let mut report = if cli.file.as_os_str() == "-" {
        ingest(io::stdin().lock(), &config)?
    } else {
        ingest_file(&cli.file, &config)?
    };
    if let Some(n) = cli.top {
        report.ranking.truncate(n);
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        print_table(&mut out, &report)?;
    }
    out.flush()?;
    Ok(())
}

fn print_table(out: &mut impl Write, report: &IngestReport<String>) -> io::Result<()> {
    let width = report
        .ranking
        .iter()
        .map(|e| e.group.chars().count())
        .max()
        .unwrap_or(0)
        .max("DOMAIN".len());

    writeln!(out, "{:<width$}  ADDRESSES", "DOMAIN")?;
    for entry in &report.ranking {
        writeln!(out, "{:<width$}  {:>9}", entry.group, entry.cardinality)?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "{} rows, {} skipped, {} duplicates",
        report.stats.rows_read, report.stats.rows_skipped, report.stats.duplicates
    )?;
    writeln!(
        out,
        "processing time: {} ms",
        report.elapsed.as_millis()
    )
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<IngestError>() {
                Some(IngestError::MissingColumn { .. }) => {
                    eprintln!("rank-groups: {err} (pass --column to pick another)");
                }
                _ => eprintln!("rank-groups: {err}"),
            }
            ExitCode::FAILURE
        }
    }
}
