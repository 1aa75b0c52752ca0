//! Web surface: router, shared state, handlers, and DTOs.

mod dto;
mod error;
mod handlers;
mod state;
mod web;

pub use error::ApiError;
pub use state::AppState;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // HTML surface
        .route("/", get(web::index))
        .route("/dashboard", post(web::dashboard))
        // JSON API
        .route("/api/render", get(handlers::render_spec))
        .route("/api/price", get(handlers::latest_price))
        .route("/api/indicators", get(handlers::indicators))
        .route("/api/news", get(handlers::news))
        .route("/health", get(handlers::health))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::tests::{stub_bars, stub_state, StubMarket};

    #[test]
    fn test_router_builds() {
        let state = stub_state(StubMarket::with_bars(stub_bars(1)));
        let _app = router(state);
    }
}
