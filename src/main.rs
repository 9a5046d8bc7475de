use anyhow::Result;
use stockist_hub::config::AppConfig;
use stockist_hub::server::ServerBuilder;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("stockist_hub=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        "Starting {} (VAT rate {})",
        config.server.service_name,
        config.tax.vat_rate
    );

    ServerBuilder::new().with_config(config).serve().await
}
