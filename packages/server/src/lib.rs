//! VLO server - HTTP front end of the OAI-PMH endpoint.
//!
//! Routes:
//! - `GET /oai`, `POST /oai`: the protocol endpoint
//! - `GET /record/{id}?format=...`: self link of one record
//! - `GET /health`: repository reachability

pub mod cli;
pub mod config;
pub mod handlers;
pub mod state;

use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the application router. Requests running longer than
/// `request_timeout` are answered with 408.
pub fn app(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/oai", get(handlers::oai_get).post(handlers::oai_post))
        .route("/record/{id}", get(handlers::record))
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}
