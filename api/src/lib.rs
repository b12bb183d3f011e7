//! FinGenius HTTP API.

pub mod error;
pub mod jobs;
pub mod middleware;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

pub fn build_router(state: AppState) -> Router {
    let allowed_hosts = Arc::new(state.config.allowed_hosts.clone());
    let cors = middleware::cors_layer(&state.config.allowed_origins);

    Router::new()
        .route("/health", get(routes::health::health))
        .route("/version", get(routes::health::version))
        .nest("/api/v1", routes::api_routes())
        .layer(axum::middleware::from_fn(middleware::process_time))
        .layer(axum::middleware::from_fn_with_state(
            allowed_hosts,
            middleware::trusted_hosts,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
