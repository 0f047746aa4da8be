//! # mmr CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mmr_cli::append::{run_append, AppendArgs};
use mmr_cli::inspect::{run_peaks, run_root};
use mmr_cli::proof::{run_proof, run_verify, ProofArgs, VerifyArgs};
use mmr_cli::simulate::{run_simulate, SimulateArgs};
use mmr_cli::GlobalOpts;

/// Merkle Mountain Range accumulator.
///
/// Appends values to an append-only log, commits to it with a single root,
/// and produces inclusion proofs the Solidity verifier accepts.
#[derive(Parser, Debug)]
#[command(name = "mmr", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Append values and print the result of each append.
    Append(AppendArgs),

    /// Print the current peaks.
    Peaks,

    /// Print the current root.
    Root,

    /// Produce an inclusion proof for an element position.
    Proof(ProofArgs),

    /// Verify a JSON proof file against a leaf value.
    Verify(VerifyArgs),

    /// Append to a fresh in-memory accumulator and print ABI-encoded roots
    /// or proofs.
    Simulate(SimulateArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("mmr CLI starting");

    let result = match &cli.command {
        Commands::Append(args) => run_append(&cli.global, args).await,
        Commands::Peaks => run_peaks(&cli.global).await,
        Commands::Root => run_root(&cli.global).await,
        Commands::Proof(args) => run_proof(&cli.global, args).await,
        Commands::Verify(args) => run_verify(&cli.global, args).await,
        Commands::Simulate(args) => run_simulate(&cli.global, args).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
