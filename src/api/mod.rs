//! HTTP API - axum router and handlers
//!
//! Two endpoints per session: plan generation and chat continuation.

pub mod handlers;
pub mod schemas;

use axum::http::HeaderValue;
use axum::routing::post;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub use handlers::AppState;
pub use schemas::{ChatRequest, TravelRequest};

/// Build the axum application with CORS for the configured origins
pub fn app(state: AppState, origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/v1/generate_plan/{session_id}",
            post(handlers::generate_plan),
        )
        .route("/api/v1/chat/{session_id}", post(handlers::chat))
        .layer(cors)
        .with_state(state)
}
