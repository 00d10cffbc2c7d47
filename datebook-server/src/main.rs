use anyhow::Result;
use datebook_core::Datebook;
use datebook_core::config::DatebookConfig;
use datebook_server::{AppState, app, singleton};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = DatebookConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();

    tracing::info!(config = ?config, "Configuration loaded");

    // Ensure only one instance writes this data directory
    let lock = singleton::acquire_lock(&config.data_path())?;
    tracing::debug!(lock = %lock.path().display(), "Acquired data directory lock");

    let datebook = Datebook::open(&config)?;
    let router = app(AppState::new(datebook));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("datebook-server listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("datebook-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
    }
}
