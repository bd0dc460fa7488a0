//! CLI commands

pub mod card;
pub mod demo;
pub mod serve;
pub mod setup;

use std::sync::Arc;

use beacon_api::{AppState, StoreNames};
use beacon_config::{AuthSetting, Config};
use beacon_demo::Generator;
use beacon_docstore::{DocumentStore, FirestoreConfig, FirestoreStore};
use beacon_gcp::{AuthMode, TokenProvider};
use beacon_warehouse::{BigQueryConfig, BigQueryStore, EventStore};

/// Construct the store adapters and application state from config
///
/// This is the single composition point; everything downstream receives
/// the stores as injected capabilities.
pub fn build_state(config: &Config) -> AppState {
    let tokens = token_provider(config);

    let warehouse_config =
        BigQueryConfig::new(config.gcp.project.as_str(), config.warehouse.dataset.as_str())
            .with_dataset_info(
                config.warehouse.location.as_str(),
                config.warehouse.description.as_str(),
            )
            .with_endpoint(config.warehouse.endpoint.as_str())
            .with_insert_batch_size(config.demo.warehouse_batch_size);
    let warehouse: Arc<dyn EventStore> =
        Arc::new(BigQueryStore::new(warehouse_config, tokens.clone()));

    let docstore_config =
        FirestoreConfig::new(config.gcp.project.as_str(), config.docstore.database.as_str())
            .with_location(config.docstore.location.as_str())
            .with_endpoint(config.docstore.endpoint.as_str())
            .with_batch_size(config.demo.docstore_batch_size);
    let docstore: Arc<dyn DocumentStore> = Arc::new(FirestoreStore::new(docstore_config, tokens));

    let generator = Arc::new(Generator::new(
        Arc::clone(&warehouse),
        Arc::clone(&docstore),
        config.demo.clone(),
    ));

    tracing::info!(
        project = %config.gcp.project,
        dataset = %config.warehouse.dataset,
        database = %config.docstore.database,
        "store adapters initialized"
    );

    AppState::new(
        warehouse,
        docstore,
        generator,
        StoreNames {
            project: config.gcp.project.clone(),
            dataset: config.warehouse.dataset.clone(),
            database: config.docstore.database.clone(),
        },
    )
}

fn token_provider(config: &Config) -> TokenProvider {
    let mode = match config.gcp.auth {
        AuthSetting::Anonymous => AuthMode::Anonymous,
        AuthSetting::Static => AuthMode::Static(config.gcp.token.clone().unwrap_or_default()),
        AuthSetting::Metadata => AuthMode::Metadata,
    };
    TokenProvider::new(mode)
}
