use axum::{
    body::Body,
    http::{HeaderName, Request},
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::AppState;

/// HTTP header carrying the request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request span tagged with the ID set by `SetRequestIdLayer`
fn make_span_with_request_id(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

/// Creates the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/health", get(handlers::health_check))
        // Shared show collection, owned by the main application
        .route(
            "/shows",
            put(handlers::replace_shows).delete(handlers::clear_shows),
        )
        .route("/shows/tags", get(handlers::get_tags))
        .route("/shows/candidates", get(handlers::get_candidates))
        // Selection
        .route("/recommend", post(handlers::recommend))
        .route("/picker", get(handlers::picker_page))
        // Hooks for external test harnesses
        .route("/debug/state", get(handlers::debug_state))
        .route("/debug/pick/random", post(handlers::debug_pick_random))
        .route("/debug/pick/ai", post(handlers::debug_pick_ai))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
