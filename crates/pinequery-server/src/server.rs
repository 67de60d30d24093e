//! HTTP server implementation

use crate::handlers;
use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use pinequery_core::{AgentFactory, Config};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state. Holds only stateless, concurrency-safe client handles.
#[derive(Clone)]
pub struct AppState {
    pub factory: Arc<AgentFactory>,
}

impl AppState {
    pub fn new(factory: AgentFactory) -> Self {
        Self {
            factory: Arc::new(factory),
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/query", post(handlers::process_query))
        .route("/search_record", post(handlers::search_record))
        .route(
            "/generate_rag_response",
            post(handlers::generate_rag_response),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Serve until the process receives Ctrl-C
pub async fn start_server(config: &Config) -> Result<()> {
    let factory = AgentFactory::from_config(config)?;
    let app = router(AppState::new(factory));

    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", config.server.bind))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("http listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}
