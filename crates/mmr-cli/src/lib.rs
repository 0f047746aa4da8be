#![deny(missing_docs)]

//! # mmr-cli: Command Line for the MMR Accumulator
//!
//! ## Subcommands
//!
//! - `mmr append`: append values, print one JSON result per value.
//! - `mmr peaks` / `mmr root`: inspect the current commitment.
//! - `mmr proof`: produce an inclusion proof (JSON or verifier calldata).
//! - `mmr verify`: check a JSON proof file.
//! - `mmr simulate`: the off-chain driver: append `1..=N` (or given values)
//!   to a fresh accumulator and print ABI-encoded roots or proofs.
//!
//! State persists across invocations only with an SQLite store:
//!
//! ```bash
//! mmr --db nodes.db append 1 2 3
//! mmr --db nodes.db proof 4 --abi
//! mmr simulate 10 --proofs
//! ```

pub mod append;
pub mod inspect;
pub mod proof;
pub mod simulate;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use mmr_engine::{DynMmr, MmrConfig, StoreConfig};
use mmr_hash::HashAlgorithm;

/// Options shared by every subcommand. Flags override the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Hash primitive (keccak or sha256).
    #[arg(long, global = true)]
    pub hasher: Option<HashAlgorithm>,

    /// SQLite database file; selects the SQLite store.
    #[arg(long, global = true, value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Accumulator id within the database.
    #[arg(long, global = true)]
    pub mmr_id: Option<String>,
}

impl GlobalOpts {
    /// Load the config file (if any) and apply flag overrides.
    pub fn resolve_config(&self) -> Result<MmrConfig> {
        let mut config = match &self.config {
            Some(path) => MmrConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => MmrConfig::default(),
        };
        if let Some(hasher) = self.hasher {
            config.hasher = hasher;
        }
        if let Some(path) = &self.db {
            config.store = StoreConfig::Sqlite { path: path.clone() };
        }
        if let Some(id) = &self.mmr_id {
            config.mmr_id = id.clone();
        }
        Ok(config)
    }

    /// Open the configured accumulator.
    pub async fn open(&self) -> Result<DynMmr> {
        let config = self.resolve_config()?;
        tracing::debug!(?config, "resolved configuration");
        DynMmr::from_config(&config)
            .await
            .context("failed to open accumulator")
    }
}
