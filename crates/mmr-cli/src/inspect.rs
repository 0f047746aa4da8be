//! # Peaks and Root Subcommands

use anyhow::Result;
use mmr_core::Bytes32;
use serde::Serialize;

use crate::GlobalOpts;

/// Current peaks of the accumulator.
#[derive(Debug, Serialize)]
pub struct PeaksReport {
    /// Elements count the peaks were read at.
    pub elements_count: u64,
    /// Peak digests, highest mountain first.
    pub peaks: Vec<Bytes32>,
}

/// Current root of the accumulator.
#[derive(Debug, Serialize)]
pub struct RootReport {
    /// Elements count the root commits to.
    pub elements_count: u64,
    /// Leaves appended so far.
    pub leaves_count: u64,
    /// Bagged root at `elements_count`.
    pub root_hash: Bytes32,
}

/// Open the configured accumulator and read its peaks.
pub async fn peaks(opts: &GlobalOpts) -> Result<PeaksReport> {
    let mmr = opts.open().await?;
    let elements_count = mmr.elements_count().await?;
    let peaks = mmr.peaks_at(elements_count).await?;
    Ok(PeaksReport {
        elements_count,
        peaks,
    })
}

/// Open the configured accumulator and read its root.
pub async fn root(opts: &GlobalOpts) -> Result<RootReport> {
    let mmr = opts.open().await?;
    let elements_count = mmr.elements_count().await?;
    Ok(RootReport {
        elements_count,
        leaves_count: mmr.leaves_count().await?,
        root_hash: mmr.root_at(elements_count).await?,
    })
}

/// Execute `mmr peaks`.
pub async fn run_peaks(opts: &GlobalOpts) -> Result<u8> {
    println!("{}", serde_json::to_string_pretty(&peaks(opts).await?)?);
    Ok(0)
}

/// Execute `mmr root`.
pub async fn run_root(opts: &GlobalOpts) -> Result<u8> {
    println!("{}", serde_json::to_string_pretty(&root(opts).await?)?);
    Ok(0)
}
