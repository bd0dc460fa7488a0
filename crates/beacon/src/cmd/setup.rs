//! Setup command - provision both stores

use anyhow::{Context, Result};
use serde_json::json;

use beacon_config::Config;

use crate::cmd::build_state;

/// Provision the warehouse and document store, printing both reports
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config);

    let warehouse = state
        .warehouse
        .setup()
        .await
        .context("warehouse setup failed")?;
    let docstore = state
        .docstore
        .setup()
        .await
        .context("docstore setup failed")?;

    let report = json!({
        "project_id": state.names.project,
        "warehouse": {
            "dataset_id": state.names.dataset,
            "created": warehouse.created,
            "already_existed": warehouse.already_existed,
        },
        "docstore": {
            "database_id": state.names.database,
            "created": docstore.created,
            "already_existed": docstore.already_existed,
        },
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
