//! Demo command - load a synthetic dataset

use anyhow::Result;
use clap::Args;

use beacon_config::Config;

use crate::cmd::build_state;

/// Demo command arguments
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Upper bound on synthetic users (config default when omitted)
    #[arg(long)]
    pub users: Option<usize>,
}

/// Generate and load demo data, printing the stats
pub async fn run(config: Config, args: DemoArgs) -> Result<()> {
    let state = build_state(&config);

    match state.generator.generate(args.users).await {
        Ok(stats) => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
            Ok(())
        }
        Err(err) => {
            // Print what did land before bailing
            eprintln!("{}", serde_json::to_string_pretty(&err.partial)?);
            Err(err.into())
        }
    }
}
