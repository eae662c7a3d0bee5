//! Application assembly: tracing, storage backend and router

use std::sync::Arc;

use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::{AppConfig, LoggingConfig, StorageBackend},
    error::AppResult,
    repository::{BookRepository, MemoryBookRepository, PostgresBookRepository},
    AppState,
};

/// Install the global tracing subscriber. `RUST_LOG` takes precedence.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("bookshelf={},tower_http=debug", config.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Build the repository selected by `storage.backend`.
///
/// The postgres backend connects and creates its table before returning.
pub async fn build_repository(config: &AppConfig) -> AppResult<Arc<dyn BookRepository>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory book storage");
            Ok(Arc::new(MemoryBookRepository::new()))
        }
        StorageBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .min_connections(config.database.min_connections)
                .connect_with(config.database.connect_options()?)
                .await?;
            tracing::info!("Connected to database");

            let repository = PostgresBookRepository::new(pool);
            repository.run_migrations().await?;
            tracing::info!("Database migrations completed");

            Ok(Arc::new(repository))
        }
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        .route("/health", get(api::health::health_check))
        .merge(api::books::routes())
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(api::openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
