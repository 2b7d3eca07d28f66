//! HTTP routes: liveness and the bin lookup endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::Request;
use axum::routing::{get, post};
use axum::{Json, Router};
use binday_core::{BinLookupService, LookupRequest, LookupResponse};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
}

pub(crate) fn router(service: Arc<BinLookupService>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/healthz", get(healthz))
        .route("/api/bin-lookup", post(bin_lookup))
        .with_state(service)
        // Wide open for local full-stack development; tighten before exposing publicly.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        // Method + path only, postcodes stay out of the request span.
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
}

async fn healthz() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn bin_lookup(
    State(service): State<Arc<BinLookupService>>,
    Json(request): Json<LookupRequest>,
) -> Json<LookupResponse> {
    Json(service.lookup(&request).await)
}
