//! Hub server setup
//!
//! Provides the WebSocket server configuration and routes.

mod handler;
mod state;

pub use handler::hub_handler;
pub use state::HubState;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use agora_common::{AppConfig, AppError};
use agora_service::ServiceContext;

use crate::rooms::RoomRegistry;

/// Create the hub router
pub fn create_router() -> Router<HubState> {
    Router::new()
        .route("/socket", get(hub_handler))
        .route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: HubState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize all dependencies and create `HubState`
pub async fn create_hub_state(config: AppConfig) -> Result<HubState, AppError> {
    tracing::info!("Connecting to PostgreSQL...");
    let pool = agora_db::create_pool(&config.database)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    tracing::info!("PostgreSQL connection established");

    let user_repo = Arc::new(agora_db::PgUserRepository::new(pool.clone()));
    let post_repo = Arc::new(agora_db::PgPostRepository::new(pool.clone()));
    let message_repo = Arc::new(agora_db::PgMessageRepository::new(pool.clone()));
    let like_repo = Arc::new(agora_db::PgLikeRepository::new(pool));

    let service_context = ServiceContext::new(user_repo, post_repo, message_repo, like_repo);

    let rooms = RoomRegistry::new_shared();

    Ok(HubState::new(service_context, rooms, config))
}

/// Run the hub server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    tracing::info!("Starting hub server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Hub listening on ws://{}/socket", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete hub server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));

    let state = create_hub_state(config).await?;
    let app = create_app(state);

    run_server(app, addr).await
}
