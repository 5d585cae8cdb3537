use anyhow::Result;
use bitget_p2p_depth::core::logging::init_logging;
use bitget_p2p_depth::core::{Config, HealthChecker};
use bitget_p2p_depth::dashboard::{DashboardMetrics, DepthService};
use bitget_p2p_depth::extractor::BitgetScraper;
use bitget_p2p_depth::server;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config.server.log_level);

    tracing::info!("🚀 Bitget P2P depth dashboard starting...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "WebDriver: {} (headless: {}, max pages: {})",
        config.scraper.webdriver_url,
        config.scraper.headless,
        config.scraper.max_pages
    );

    let scraper = BitgetScraper::new(config.scraper.clone())?;
    let health = HealthChecker::new();
    let metrics = Arc::new(DashboardMetrics::new());
    let service = Arc::new(DepthService::new(
        Arc::new(scraper),
        config.display.clone(),
        health.clone(),
        metrics.clone(),
    ));

    tracing::info!(
        "✅ Dashboard on http://0.0.0.0:{}/ (refresh every {}s)",
        config.server.port,
        config.display.refresh_secs
    );

    server::serve(service, health, metrics, config.server.port).await;
    Ok(())
}
