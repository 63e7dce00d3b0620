use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, BackendKind, StorageConfig};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;
use service::storage::{MemStorage, MongoStorage, SeaOrmStorage, Storage};

fn build_cors() -> CorsLayer {
    // The frontend is deployed on its own origin.
    CorsLayer::very_permissive()
}

/// Construct the one storage backend the process will use.
///
/// Durable backends connect here, before any socket is bound, so a missing or
/// unreachable store stops startup instead of serving without persistence.
pub async fn build_storage(cfg: &StorageConfig) -> Result<Arc<dyn Storage>, StartupError> {
    let storage: Arc<dyn Storage> = match cfg.backend_kind() {
        BackendKind::Memory => {
            warn!("using in-memory storage; data is lost on restart");
            Arc::new(MemStorage::new())
        }
        BackendKind::Mongodb => {
            let uri = cfg
                .mongodb_uri
                .as_deref()
                .ok_or_else(|| StartupError::InvalidConfig("MONGODB_URI environment variable is not set".into()))?;
            let database = cfg.mongodb_database_name();
            Arc::new(MongoStorage::connect(uri, &database).await?)
        }
        BackendKind::Postgres => {
            let url = cfg
                .database_url
                .as_deref()
                .ok_or_else(|| StartupError::InvalidConfig("DATABASE_URL environment variable is not set".into()))?;
            Arc::new(SeaOrmStorage::connect(url, cfg.max_connections).await?)
        }
    };
    info!(backend = storage.backend_name(), "storage initialized");
    Ok(storage)
}

/// Build the router for a given storage backend.
pub fn build_app(storage: Arc<dyn Storage>) -> Router {
    routes::build_router(AppState::new(storage), build_cors())
}

/// Run the HTTP server with an already validated configuration.
pub async fn serve(cfg: AppConfig) -> Result<(), StartupError> {
    let storage = build_storage(&cfg.storage).await?;
    let app = build_app(storage);

    let addr: SocketAddr = cfg
        .bind_addr()
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {}: {e}", cfg.bind_addr())))?;
    info!(%addr, backend = cfg.storage.backend_kind().as_str(), "starting waste pickup server");
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(anyhow::Error::from)?;
    axum::serve(listener, app).await.map_err(anyhow::Error::from)?;
    Ok(())
}
