//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: storage, cache, token and revalidation wiring
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response bodies that are not records
//! - `errors.rs`: plain-text error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: Arc<AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        tokens: Arc::new(services.tokens.clone()),
    };
    let cors_state = middleware::CorsState::new(services.frontend_origins.iter().cloned());

    // Protected routes: require a valid bearer token.
    let protected = routes::protected_router().route_layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    let api = Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::public_router())
        .merge(protected)
        .fallback(routes::items::unmatched)
        .layer(axum::middleware::from_fn_with_state(cors_state, middleware::cors_middleware));

    // Login answers its own preflight, so it stays outside the CORS layer.
    Router::new().merge(routes::login::router()).merge(api).layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(middleware::trace_middleware))
            .layer(Extension(services)),
    )
}
