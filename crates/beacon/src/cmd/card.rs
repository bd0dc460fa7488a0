//! Card command - compute one metric card from the CLI

use anyhow::{Context, Result};
use clap::Args;

use beacon_config::Config;

use crate::cmd::build_state;

/// Card command arguments
#[derive(Args, Debug)]
pub struct CardArgs {
    /// Customer (company) identifier
    #[arg(long)]
    pub customer: String,

    /// Card id (e.g. calls_count_7d_window_30d)
    #[arg(long)]
    pub card: String,
}

/// Compute one card and print its JSON payload
pub async fn run(config: Config, args: CardArgs) -> Result<()> {
    let state = build_state(&config);

    let payload = state
        .engine
        .compute_card(&args.card, &args.customer)
        .await
        .with_context(|| format!("card '{}' failed", args.card))?;

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
