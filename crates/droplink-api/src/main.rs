use anyhow::Result;
use droplink_core::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let (state, router) = droplink_api::setup::initialize_app(config.clone()).await?;

    // Background expiry reaper; lookup-triggered lazy deletes cover the
    // window between sweeps.
    state.cleanup.clone().start();

    droplink_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
