mod accessor;
mod api_doc;
mod config;
mod error;
mod handlers;
mod id_guard;
mod memory;
mod menu_item;
mod models;
mod routes;
mod spanner;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Context;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use accessor::MenuItemAccessor;
use config::{Config, StorageBackend};
use memory::InMemoryAccessor;
use spanner::SpannerAccessor;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("rust-spanner-menu starting");

    let config = Config::from_env()?;
    config.log_startup();

    let accessor: Arc<dyn MenuItemAccessor> = match &config.storage_backend {
        StorageBackend::Memory => Arc::new(InMemoryAccessor::new()),
        StorageBackend::Spanner(settings) => Arc::new(SpannerAccessor::from_settings(settings).await?),
    };

    let addr = format!("{}:{}", config.service_host, config.service_port);

    let state = AppState {
        accessor,
        config: Arc::new(config),
    };

    let app = routes::build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on http://{}", addr);
    tracing::info!("API docs: http://{}{}", addr, routes::SWAGGER_UI);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
