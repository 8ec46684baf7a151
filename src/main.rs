use tracing_subscriber::EnvFilter;

use taskpilot::api;
use taskpilot::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!(
        "starting taskpilot (db: {}, model: {})",
        config.db_path.display(),
        config.model
    );

    api::serve(config).await
}
