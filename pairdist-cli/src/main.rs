use anyhow::{Context, Result};
use clap::Parser;
use pairdist_core::{
    AlignedPair, DistanceMatrix, FastaProvider, FillSummary, MatrixOrchestrator, SequenceProvider,
};
use serde::Serialize;
use std::path::PathBuf;

mod config;
mod error;
mod grid;

use config::Config;
use error::{parse_selection, print_error_and_exit, CliError};
use grid::{ProgressLogger, TextGrid};

#[derive(Parser)]
#[command(name = "pairdist")]
#[command(about = "pairdist - all-pairs sequence alignment cost matrix")]
#[command(version)]
#[command(long_about = "
pairdist scores every pair of the first N sequences of a FASTA file with a
global alignment cost (match -3, substitution 1, indel 5) and prints the
resulting matrix. A single cell can be traced back to its aligned strings.

Examples:
  pairdist --fasta genes.fa
  pairdist --fasta genes.fa --limit 25 --parallel --threads 8
  pairdist --fasta genes.fa --select 2,5
  pairdist --fasta genes.fa --json > matrix.json
")]
pub struct Cli {
    /// Input sequence file (FASTA/FASTQ)
    #[arg(long, required_unless_present = "example_config")]
    pub fasta: Option<PathBuf>,

    /// Number of leading sequences to load
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Trace the cell at ROW,COL and print its alignment
    #[arg(long, value_parser = parse_selection)]
    pub select: Option<(usize, usize)>,

    /// Fill the matrix on the thread pool
    #[arg(long)]
    pub parallel: bool,

    /// Print a JSON report instead of the text grid
    #[arg(long)]
    pub json: bool,

    /// Print an example pairdist.toml and exit
    #[arg(long)]
    pub example_config: bool,

    /// Configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of threads to use
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    sequences: Vec<&'a str>,
    matrix: &'a DistanceMatrix,
    summary: FillSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    alignment: Option<AlignedPair>,
}

fn setup_logging(verbose: u8, quiet: bool) -> Result<()> {
    if quiet {
        std::env::set_var("RUST_LOG", "error");
    } else {
        let level = match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        std::env::set_var("RUST_LOG", level);
    }

    env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .init();

    Ok(())
}

fn print_alignment(aligned: &AlignedPair, row: usize, column: usize, show_alignment: bool) {
    println!();
    println!("Alignment of cell ({}, {}), cost {}", row, column, aligned.cost);
    if show_alignment {
        println!("{}", aligned);
        let stats = aligned.stats();
        println!(
            "matches {}, mismatches {}, insertions {}, deletions {}, identity {:.1}%",
            stats.matches,
            stats.mismatches,
            stats.insertions,
            stats.deletions,
            stats.identity()
        );
    } else {
        println!("{}", aligned.top);
        println!("{}", aligned.bottom);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Setup logging
    setup_logging(cli.verbose, cli.quiet)?;

    if cli.example_config {
        print!("{}", Config::example_toml()?);
        return Ok(());
    }

    // Load configuration
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_overrides(cli.limit, cli.parallel, cli.json);

    // Set global thread count if specified
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to set thread count")?;
    }

    let fasta = cli
        .fasta
        .ok_or_else(|| CliError::input("no FASTA file given"))?;
    if !fasta.exists() {
        return Err(CliError::file_not_found(fasta).into());
    }

    log::info!("Processing...");
    let provider =
        FastaProvider::from_path(&fasta, Some(config.input.limit)).map_err(CliError::from)?;
    let mut orchestrator =
        MatrixOrchestrator::new(config.engine.clone()).map_err(CliError::from)?;

    let mut grid = TextGrid::new(provider.sequences());
    let summary = orchestrator
        .run(&provider, &mut grid, &mut ProgressLogger::new())
        .map_err(CliError::from)?;

    let alignment = match cli.select {
        Some((row, column)) => Some(
            orchestrator
                .select(&provider, row, column)
                .map_err(CliError::from)?,
        ),
        None => None,
    };

    if config.output.json {
        let report = Report {
            sequences: provider.sequences().iter().map(|s| s.id.as_str()).collect(),
            matrix: grid.matrix(),
            summary,
            alignment,
        };
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
        return Ok(());
    }

    print!("{}", grid);
    println!(
        "Done. Time taken: {:?} ({} alignments computed, {} cache hits)",
        summary.elapsed, summary.computed, summary.cache_hits
    );

    if let (Some(aligned), Some((row, column))) = (alignment, cli.select) {
        print_alignment(&aligned, row, column, config.output.show_alignment);
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match run(cli) {
        Err(err) => match err.downcast_ref::<CliError>() {
            Some(cli_err) => print_error_and_exit(cli_err),
            None => Err(err),
        },
        ok => ok,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::try_parse_from([
            "pairdist", "--fasta", "in.fa", "--select", "1,2", "--limit", "4", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.fasta, Some(PathBuf::from("in.fa")));
        assert_eq!(cli.select, Some((1, 2)));
        assert_eq!(cli.limit, Some(4));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_fasta_required() {
        assert!(Cli::try_parse_from(["pairdist"]).is_err());
        assert!(Cli::try_parse_from(["pairdist", "--example-config"]).is_ok());
        assert!(Cli::try_parse_from(["pairdist", "--fasta", "a.fa", "--select", "x"]).is_err());
    }
}
