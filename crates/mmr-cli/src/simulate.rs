//! # Simulate Subcommand
//!
//! Replays the off-chain driver used to generate fixtures for the Solidity
//! verifier. A fresh in-memory accumulator receives `1..=COUNT` (or the
//! `;`-separated `--values`), then:
//!
//! - with `--proofs`, each append is proven immediately and the ABI-encoded
//!   `(index, value, proof, peaks, pos, rootHash)` tuples are joined by `;`;
//! - otherwise the ABI encoding of every root as `bytes32[]` is printed, or
//!   with `--final-root-only` just the last root as `bytes32`.

use anyhow::{bail, Context, Result};
use clap::Args;
use mmr_core::encode_value;
use mmr_engine::{abi, Mmr};
use mmr_hash::hasher_for;
use mmr_store::MemoryStore;

use crate::GlobalOpts;

/// Arguments for `mmr simulate`.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Number of values to append when `--values` is not given.
    pub count: u64,

    /// Emit ABI-encoded proofs instead of roots.
    #[arg(long)]
    pub proofs: bool,

    /// Values to append, separated by `;`.
    #[arg(long)]
    pub values: Option<String>,

    /// Print only the final root.
    #[arg(long)]
    pub final_root_only: bool,
}

impl SimulateArgs {
    fn elements(&self) -> Vec<String> {
        match &self.values {
            Some(values) => values.split(';').map(str::to_string).collect(),
            None => (1..=self.count).map(|v| v.to_string()).collect(),
        }
    }
}

/// Run the simulation and return the text to print.
pub async fn simulate(opts: &GlobalOpts, args: &SimulateArgs) -> Result<String> {
    let config = opts.resolve_config()?;
    let elements = args.elements();
    if elements.is_empty() {
        bail!("nothing to append: COUNT is 0 and no --values given");
    }

    let mut mmr = Mmr::new(MemoryStore::new(), hasher_for(config.hasher));
    let mut proofs = Vec::new();
    let mut roots = Vec::new();

    for element in &elements {
        let result = mmr
            .append(element)
            .await
            .with_context(|| format!("failed to append {element:?}"))?;
        if args.proofs {
            let value = encode_value(element)?;
            let proof = mmr.proof(result.element_position).await?;
            let call = proof.to_verification_call(value, result.root_hash);
            proofs.push(call.abi_encode_hex());
        } else {
            roots.push(result.root_hash);
        }
    }
    tracing::info!(appended = elements.len(), hasher = %config.hasher, "simulation finished");

    if args.proofs {
        return Ok(proofs.join(";"));
    }
    match roots.last() {
        Some(last) if args.final_root_only => Ok(abi::to_hex(&abi::abi_encode_digest(last))),
        _ => Ok(abi::to_hex(&abi::abi_encode_digests(&roots))),
    }
}

/// Execute `mmr simulate`.
pub async fn run_simulate(opts: &GlobalOpts, args: &SimulateArgs) -> Result<u8> {
    let output = simulate(opts, args).await?;
    if args.proofs {
        print!("{output}");
    } else {
        println!("{output}");
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(count: u64) -> SimulateArgs {
        SimulateArgs {
            count,
            proofs: false,
            values: None,
            final_root_only: false,
        }
    }

    #[test]
    fn values_override_count() {
        let a = SimulateArgs {
            values: Some("5;0x10;7".to_string()),
            ..args(100)
        };
        assert_eq!(a.elements(), vec!["5", "0x10", "7"]);
        assert_eq!(args(3).elements(), vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn final_root_only_is_one_word() {
        let a = SimulateArgs {
            final_root_only: true,
            ..args(3)
        };
        let out = simulate(&GlobalOpts::default(), &a).await.unwrap();
        assert_eq!(
            out,
            "0x9cf52726b5c1f29825fa3757402809afeb76f510e83e95559d9a5504a243b373"
        );
    }

    #[tokio::test]
    async fn roots_are_a_bytes32_array() {
        let out = simulate(&GlobalOpts::default(), &args(2)).await.unwrap();
        let expected = format!(
            "0x{:064x}{:064x}{}{}",
            32,
            2,
            "edb38a93e6e2e82dbb40826a878df1d817a37ef13fcaa25248649a90fa47497b",
            "112e2be63bd7e73b3af704af8f4c8f6086fe3773003738f4ee9ada285d308d53"
        );
        assert_eq!(out, expected);
    }

    #[tokio::test]
    async fn proofs_are_semicolon_separated() {
        let a = SimulateArgs {
            proofs: true,
            ..args(4)
        };
        let out = simulate(&GlobalOpts::default(), &a).await.unwrap();
        let parts: Vec<&str> = out.split(';').collect();
        assert_eq!(parts.len(), 4);
        assert!(parts.iter().all(|p| p.starts_with("0x")));
        // Fourth append: leaf at position 5 holding value 4.
        let fourth = parts[3];
        assert!(fourth.starts_with(&format!("0x{:064x}{:064x}", 5, 4)));
    }

    #[tokio::test]
    async fn empty_run_is_an_error() {
        assert!(simulate(&GlobalOpts::default(), &args(0)).await.is_err());
    }
}
