use file_check_service::config::FileCheckConfig;
use file_check_service::services::init_metrics;
use file_check_service::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Also reads .env. A missing bucket name stops the process before anything binds.
    let config = FileCheckConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "file-check-service",
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    )?;

    // Initialize metrics recorder (must be before any metrics are recorded)
    init_metrics()?;

    let app = Application::build(config).await?;
    tracing::info!("Server is running on http://localhost:{}", app.port());

    app.run_until_stopped().await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
