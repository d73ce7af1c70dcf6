//! GeneWeaver API server - main entry point

use anyhow::Result;
use gw_common::logging::{init_logging, LogConfig};
use std::sync::Arc;
use tracing::info;

use gw_server::{
    api,
    config::Config,
    db::{self, DbConfig, PgStore},
    features::FeatureState,
    pubmed::EutilsClient,
};

#[tokio::main]
async fn main() -> Result<()> {
    let log_config = LogConfig::from_env()?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(&log_config)?;

    info!("Starting GeneWeaver API server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let pool = db::create_pool(&DbConfig::from(&config.database)).await?;
    info!("Database connection pool established");

    let pubmed = EutilsClient::new(&config.pubmed)?;

    let state = FeatureState {
        store: Arc::new(PgStore::new(pool)),
        pubmed: Arc::new(pubmed),
        batch: config.batch.clone(),
    };

    api::serve(state, &config).await
}
