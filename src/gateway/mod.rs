//! HTTP gateway (Axum) for the scan endpoint.
//!
//! This module is primarily used by the `sightline` server binary.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::scan_handler;
pub use state::HandlerState;

use crate::catalog::CatalogClient;
use crate::refstore::ReferenceStore;

/// Response header carrying the scan outcome label.
pub const OUTCOME_HEADER: &str = "x-sightline-outcome";

/// Max accepted photo upload size.
pub const MAX_PHOTO_BYTES: usize = 16 * 1024 * 1024;

pub fn create_router_with_state<C, R>(state: HandlerState<C, R>) -> Router
where
    C: CatalogClient + 'static,
    R: ReferenceStore + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/v1/scan", post(scan_handler))
        .layer(DefaultBodyLimit::max(MAX_PHOTO_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub encoder: &'static str,
    pub encoder_mode: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(OUTCOME_HEADER, HeaderValue::from_static("healthy"));

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler<C, R>(State(state): State<HandlerState<C, R>>) -> Response
where
    C: CatalogClient + 'static,
    R: ReferenceStore + 'static,
{
    let encoder_mode = if state.pipeline.is_encoder_stub() {
        "stub"
    } else {
        "real"
    };

    let components = ComponentStatus {
        http: "ready",
        encoder: "ready",
        encoder_mode,
    };

    (
        StatusCode::OK,
        Json(ReadyResponse {
            status: "ok",
            components,
        }),
    )
        .into_response()
}
