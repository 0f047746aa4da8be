//! # Proof and Verify Subcommands
//!
//! `mmr proof` prints a [`Proof`] as JSON, or with `--abi` the hex calldata
//! arguments of the Solidity verifier. `mmr verify` reads a JSON proof file
//! back and checks it against a leaf value.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use mmr_core::{encode_value, Bytes32};
use mmr_engine::Proof;

use crate::GlobalOpts;

/// Arguments for `mmr proof`.
#[derive(Args, Debug)]
pub struct ProofArgs {
    /// Element position to prove.
    pub position: u64,

    /// Prove against an earlier elements count instead of the current one.
    #[arg(long)]
    pub elements_count: Option<u64>,

    /// Print ABI-encoded verifier arguments instead of JSON.
    #[arg(long)]
    pub abi: bool,
}

/// Arguments for `mmr verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Leaf value the proof should commit to (decimal or 0x hex).
    #[arg(long)]
    pub value: String,

    /// JSON proof file, as printed by `mmr proof`.
    #[arg(long, value_name = "FILE")]
    pub proof: PathBuf,

    /// Expected root. Defaults to the accumulator's root at the proof's
    /// elements count.
    #[arg(long)]
    pub root: Option<String>,
}

/// Execute `mmr proof`.
pub async fn run_proof(opts: &GlobalOpts, args: &ProofArgs) -> Result<u8> {
    let mmr = opts.open().await?;
    let proof = match args.elements_count {
        Some(count) => mmr.proof_at(args.position, count).await?,
        None => mmr.proof(args.position).await?,
    };

    if args.abi {
        let node = mmr.node(args.position).await?;
        let Some(value) = node.value() else {
            bail!("position {} is an internal node; the verifier only accepts leaves", args.position);
        };
        let root = mmr.root_at(proof.elements_count).await?;
        println!("{}", proof.to_verification_call(value, root).abi_encode_hex());
    } else {
        println!("{}", serde_json::to_string_pretty(&proof)?);
    }
    Ok(0)
}

/// Verify a proof file; `Ok(true)` when it checks out.
pub async fn verify(opts: &GlobalOpts, args: &VerifyArgs) -> Result<bool> {
    let content = std::fs::read_to_string(&args.proof)
        .with_context(|| format!("failed to read proof file: {}", args.proof.display()))?;
    let proof: Proof = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse proof JSON: {}", args.proof.display()))?;
    let value = encode_value(&args.value).context("invalid --value")?;

    let mmr = opts.open().await?;
    let root = match &args.root {
        Some(hex) => Bytes32::from_hex(hex).context("invalid --root")?,
        None => mmr.root_at(proof.elements_count).await?,
    };
    Ok(proof.verify(mmr.hasher(), &value, &root)?)
}

/// Execute `mmr verify`.
pub async fn run_verify(opts: &GlobalOpts, args: &VerifyArgs) -> Result<u8> {
    if verify(opts, args).await? {
        println!("OK: proof verified");
        Ok(0)
    } else {
        println!("FAILED: proof does not verify");
        Ok(1)
    }
}
