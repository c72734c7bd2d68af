mod config;
mod main_lib;

use config::Config;
use main_lib::{init_tracing, run_demo};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.log_format);
    tracing::info!(
        "Using collection '{}' in time zone {}",
        config.sync.collection,
        config.sync.time_zone
    );
    run_demo(&config).await
}
