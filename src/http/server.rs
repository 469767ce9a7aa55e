//! Router construction and middleware wiring.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, panic recovery)
//!
//! # Design Decisions
//! - Request ID added as early as possible so the trace span carries it
//! - Per-request read/write bounds are a server property and live in the
//!   lifecycle manager, not here; this module is routing glue only

use axum::{
    http::{HeaderName, Request},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info_span;

use crate::http::handlers;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Build the router with all middleware layers.
pub fn build_router() -> Router {
    let x_request_id = HeaderName::from_static(X_REQUEST_ID);

    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                match request.headers().get(X_REQUEST_ID) {
                    Some(request_id) => info_span!("http_request", request_id = ?request_id),
                    None => info_span!("http_request"),
                }
            }),
        )
        .layer(PropagateRequestIdLayer::new(x_request_id))
        .layer(CatchPanicLayer::new());

    Router::new()
        .route("/ping", get(handlers::ping))
        .route(
            "/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .layer(middleware)
}
