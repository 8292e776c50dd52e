use std::sync::Arc;

use tracing::info;

use crate::config::{AppConfig, StorageBackend};
use crate::inference::{HttpInferenceClient, InferenceClient};
use crate::persistence::{FileStore, HistoryStore, MemoryStore};
use crate::session::ChatSession;
use crate::web::{self, AppState};

/// Build the history store selected by the configuration.
pub fn build_store(config: &AppConfig) -> Arc<dyn HistoryStore> {
    match config.storage.backend {
        StorageBackend::File => Arc::new(FileStore::new(&config.storage.dir, &config.storage.key)),
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
    }
}

/// Wire the services together and return the router.
pub async fn build_app(config: &AppConfig) -> axum::Router {
    let store = build_store(config);
    let client: Arc<dyn InferenceClient> =
        Arc::new(HttpInferenceClient::new(config.inference_settings()));

    info!(
        name: "inference.config.loaded",
        endpoint = %config.inference.endpoint,
        backend = ?config.storage.backend,
        "Inference configuration loaded"
    );

    let session = ChatSession::open(store, client, None).await;
    web::router(AppState::new(session))
}

pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let app = build_app(&config).await;

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
