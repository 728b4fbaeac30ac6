use dossier_console::config::get_configuration;
use dossier_console::startup::build_router;
use dossier_console::AppState;
use dossier_core::observability::init_tracing;
use dossier_core::ApiClient;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "dossier-console",
        &configuration.telemetry.log_level,
        configuration.telemetry.otlp_endpoint.as_deref(),
    );

    dossier_console::services::metrics::init_metrics();

    let api = ApiClient::new(
        configuration.backend.base_url.clone(),
        configuration.backend.timeout(),
    )
    .map_err(|e| anyhow::anyhow!("Failed to build backend client: {}", e))?;

    let app = build_router(AppState::new(Arc::new(api)), &configuration.session);

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!(
        backend = %configuration.backend.base_url,
        "Starting dossier-console on {}", address
    );
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
