use std::time::Instant;

use axum::{
    Json,
    extract::{Multipart, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, error, instrument};

use crate::catalog::CatalogClient;
use crate::refstore::ReferenceStore;
use crate::scan::ScanRequest;

use super::OUTCOME_HEADER;
use super::error::GatewayError;
use super::payload::ScanResponse;
use super::state::HandlerState;

/// `POST /v1/scan`: multipart photo + location/orientation form fields.
#[instrument(skip(state, multipart))]
pub async fn scan_handler<C, R>(
    State(state): State<HandlerState<C, R>>,
    multipart: Multipart,
) -> Result<Response, GatewayError>
where
    C: CatalogClient + 'static,
    R: ReferenceStore + 'static,
{
    let started = Instant::now();

    let request = parse_scan_request(multipart, &started).await?;

    debug!(
        lat = request.lat,
        lng = request.lng,
        heading_deg = request.heading_deg,
        photo_bytes = request.photo.len(),
        "Scan request accepted"
    );

    let report = state.pipeline.run(request).await.map_err(|e| {
        error!(error = %e, "Scan pipeline failed");
        GatewayError::Upstream {
            message: e.to_string(),
            latency_ms: started.elapsed().as_millis() as u64,
        }
    })?;

    let response = ScanResponse::from_report(report);

    let mut headers = HeaderMap::new();
    headers.insert(
        OUTCOME_HEADER,
        HeaderValue::from_static(response.outcome_label()),
    );

    Ok((StatusCode::OK, headers, Json(response)).into_response())
}

async fn parse_scan_request(
    mut multipart: Multipart,
    started: &Instant,
) -> Result<ScanRequest, GatewayError> {
    let invalid = |message: String, started: &Instant| GatewayError::InvalidRequest {
        message,
        latency_ms: started.elapsed().as_millis() as u64,
    };

    let mut photo: Option<Vec<u8>> = None;
    let mut lat: Option<f64> = None;
    let mut lng: Option<f64> = None;
    let mut gps_accuracy_m: f32 = 0.0;
    let mut heading_deg: Option<f32> = None;
    let mut pitch_deg: f32 = 0.0;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| invalid(format!("malformed multipart body: {e}"), started))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "photo" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| invalid(format!("failed to read photo field: {e}"), started))?;
                photo = Some(bytes.to_vec());
            }
            "lat" => lat = Some(parse_number(field, "lat", started).await?),
            "lng" => lng = Some(parse_number(field, "lng", started).await?),
            "gps_accuracy" => {
                gps_accuracy_m = parse_number(field, "gps_accuracy", started).await?;
            }
            "bearing" => heading_deg = Some(parse_number(field, "bearing", started).await?),
            "pitch" => pitch_deg = parse_number(field, "pitch", started).await?,
            other => {
                debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    let photo = photo.ok_or_else(|| invalid("missing `photo` field".to_string(), started))?;
    let lat = lat.ok_or_else(|| invalid("missing `lat` field".to_string(), started))?;
    let lng = lng.ok_or_else(|| invalid("missing `lng` field".to_string(), started))?;
    let heading_deg =
        heading_deg.ok_or_else(|| invalid("missing `bearing` field".to_string(), started))?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(invalid(format!("coordinates out of range: {lat}, {lng}"), started));
    }

    Ok(ScanRequest {
        photo,
        lat,
        lng,
        gps_accuracy_m,
        heading_deg,
        pitch_deg,
    })
}

async fn parse_number<T: std::str::FromStr>(
    field: axum::extract::multipart::Field<'_>,
    name: &'static str,
    started: &Instant,
) -> Result<T, GatewayError> {
    let text = field
        .text()
        .await
        .map_err(|e| GatewayError::InvalidRequest {
            message: format!("failed to read `{name}` field: {e}"),
            latency_ms: started.elapsed().as_millis() as u64,
        })?;

    text.trim().parse().map_err(|_| GatewayError::InvalidRequest {
        message: format!("invalid `{name}` value: '{text}'"),
        latency_ms: started.elapsed().as_millis() as u64,
    })
}
