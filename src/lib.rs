pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod scoring;

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Failures that stop the process before it starts serving.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("storage unavailable: {0}")]
    Storage(#[from] db::StorageError),
    #[error("{0}")]
    Server(String),
}

/// Install the global tracing subscriber. Later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

/// Process entry point: config → store → server, until ctrl-c.
pub async fn run() -> Result<(), StartupError> {
    init_tracing();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let cfg = AppConfig::from_env();
    tracing::info!(bind = %cfg.bind_addr, backend = cfg.storage.name(), "Configuration loaded");

    let store = db::open_store(&cfg.storage).await?;
    let mut server = api::start_api_server(store, cfg.bind_addr)
        .await
        .map_err(StartupError::Server)?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for ctrl-c, shutting down: {e}");
    }

    server.shutdown();
    server.stopped().await;
    tracing::info!("{} stopped", config::APP_NAME);
    Ok(())
}
