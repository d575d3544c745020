use anyhow::Context;
use order_enrichment::api;
use order_enrichment::config::AppConfig;
use order_enrichment::lifecycle::{setup_tracing, OrderSystem};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup_tracing();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let system = OrderSystem::start(&config);
    let app = api::router(system.app_state());

    let listener = tokio::net::TcpListener::bind(config.http_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.http_addr))?;
    info!(addr = %config.http_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received");
        })
        .await?;

    system.shutdown().await?;
    Ok(())
}
