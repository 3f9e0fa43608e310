//! Schema bootstrap for followgraph.
//!
//! Loads the configuration, connects to the database and applies every
//! pending migration, then exits.

use anyhow::Context;
use followgraph_common::{Config, config::LoggingConfig};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    info!("Connecting to database...");
    let db = followgraph_db::init(&config).await?;

    info!("Running database migrations...");
    followgraph_db::migrate(&db).await?;
    info!("Migrations completed");

    db.close().await.context("failed to close database connection")?;
    Ok(())
}
