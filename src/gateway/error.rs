use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::OUTCOME_HEADER;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {message}")]
    InvalidRequest { message: String, latency_ms: u64 },

    #[error("scan failed: {message}")]
    Upstream { message: String, latency_ms: u64 },
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    pub latency_ms: u64,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, latency_ms, outcome_label) = match &self {
            GatewayError::InvalidRequest { latency_ms, .. } => {
                (StatusCode::BAD_REQUEST, *latency_ms, "invalid_request")
            }
            // Upstream outages are the only server-error class; every other
            // outcome is a normal 200 describing why no match exists.
            GatewayError::Upstream { latency_ms, .. } => {
                (StatusCode::BAD_GATEWAY, *latency_ms, "upstream_error")
            }
        };

        let mut headers = HeaderMap::new();
        headers.insert(OUTCOME_HEADER, HeaderValue::from_static(outcome_label));

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
            latency_ms,
        });

        (status, headers, body).into_response()
    }
}
