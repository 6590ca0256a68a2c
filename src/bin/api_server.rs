// src/bin/api_server.rs

use geological_sample_api::infra::config::{ServerConfig, StorageBackend};
use geological_sample_api::infra::telemetry;
use geological_sample_api::transport;
use geological_sample_api::{MemorySampleStore, PgSampleStore, SampleService, SampleStore};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;
    telemetry::init_tracing();

    // --- Store Initialization ---
    let store: Arc<dyn SampleStore> = match &config.storage {
        StorageBackend::Postgres {
            database_url,
            max_connections,
        } => {
            info!("initializing postgres sample store");
            Arc::new(PgSampleStore::connect(database_url, *max_connections).await?)
        }
        StorageBackend::Memory => {
            warn!("using in-memory sample store; data is lost on shutdown");
            Arc::new(MemorySampleStore::new())
        }
    };
    store.ping().await?;

    // --- Service Initialization ---
    let sample_service = Arc::new(SampleService::new(store));

    if !config.static_dir.join("index.html").is_file() {
        info!(
            static_dir = %config.static_dir.display(),
            "no frontend build found; / will serve API info"
        );
    }
    let app_state = transport::http::AppState {
        sample_service,
        static_dir: Some(config.static_dir.clone()),
    };

    // --- API Server Initialization ---
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "API server listening");
    info!("Swagger UI available at /swagger-ui");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("graceful shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received (Ctrl+C)"),
        Err(e) => error!(error = %e, "failed to listen for Ctrl+C"),
    }
}
