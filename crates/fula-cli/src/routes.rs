//! HTTP route definitions

use crate::{handlers, middleware, AppState};
use axum::{
    middleware as axum_middleware,
    routing::head,
    Router,
};
use fula_hostname::hostname_middleware;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main router
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    // Content routes, matched against the path after hostname routing
    let content = Router::new()
        .route(
            "/",
            head(handlers::health_check).fallback(handlers::forward_content),
        )
        .fallback(handlers::forward_content)
        .with_state(Arc::clone(&state));

    // Hostname routing has to run before path matching so rewritten
    // paths reach the right route
    Router::new()
        .fallback_service(content)
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&state.hostname),
            hostname_middleware,
        ))
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
