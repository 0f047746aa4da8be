//! # Append Subcommand

use anyhow::{Context, Result};
use clap::Args;
use mmr_engine::AppendResult;

use crate::GlobalOpts;

/// Arguments for `mmr append`.
#[derive(Args, Debug)]
pub struct AppendArgs {
    /// Values to append, in order (decimal or 0x-prefixed hex).
    #[arg(required = true, value_name = "VALUE")]
    pub values: Vec<String>,
}

/// Append the values and return one result per value.
pub async fn append(opts: &GlobalOpts, args: &AppendArgs) -> Result<Vec<AppendResult>> {
    let mut mmr = opts.open().await?;
    let mut results = Vec::with_capacity(args.values.len());
    for value in &args.values {
        let result = mmr
            .append(value)
            .await
            .with_context(|| format!("failed to append {value:?}"))?;
        tracing::info!(
            element_position = result.element_position,
            elements_count = result.elements_count,
            "appended {value}"
        );
        results.push(result);
    }
    Ok(results)
}

/// Execute `mmr append`, printing one JSON object per line.
pub async fn run_append(opts: &GlobalOpts, args: &AppendArgs) -> Result<u8> {
    for result in append(opts, args).await? {
        println!("{}", serde_json::to_string(&result)?);
    }
    Ok(0)
}
