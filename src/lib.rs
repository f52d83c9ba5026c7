//! TechSolutions gateway: REST CRUD routes for clients, projects and tasks over a relational store.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod response;
pub mod routes;
pub mod schema;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{GatewayConfig, StoreBackend};
pub use error::{AppError, ConfigError, StoreError};
pub use routes::{api_routes, common_routes};
pub use state::AppState;
pub use store::{ensure_tables, MemoryStore, PgStore, RestStore, TableStore};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Full application router: common routes at the root, resources under `/api`.
pub fn app(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api", api_routes(state))
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Build the store selected by `backend`. The postgres pool connects lazily unless the DDL bootstrap runs.
pub async fn build_store(backend: &StoreBackend) -> Result<Arc<dyn TableStore>, StoreError> {
    let store: Arc<dyn TableStore> = match backend {
        StoreBackend::Rest(cfg) => Arc::new(RestStore::new(cfg)?),
        StoreBackend::Postgres(cfg) => {
            let store = PgStore::connect_lazy(cfg)?;
            if cfg.apply_schema {
                ensure_tables(store.pool(), &cfg.schema).await?;
            }
            Arc::new(store)
        }
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };
    Ok(store)
}
