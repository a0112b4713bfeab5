//! Scan orchestration.
//!
//! [`ScanPipeline`] sequences encode → select → score → decide for one
//! request and attaches wall-clock latency to every outcome, including
//! failures. Collaborators are injected at construction so the pipeline
//! never reaches for process-wide state.

pub mod error;
pub mod pipeline;

#[cfg(test)]
mod tests;

pub use error::ScanError;
pub use pipeline::ScanPipeline;

use std::time::Duration;

use uuid::Uuid;

use crate::scoring::ScanOutcome;

/// Ephemeral input for one scan. Never persisted by the matching core.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    /// Raw photo bytes as uploaded.
    pub photo: Vec<u8>,
    /// Request latitude.
    pub lat: f64,
    /// Request longitude.
    pub lng: f64,
    /// Reported GPS accuracy, meters.
    pub gps_accuracy_m: f32,
    /// Device compass heading, degrees.
    pub heading_deg: f32,
    /// Device pitch, degrees.
    pub pitch_deg: f32,
}

/// The decision for one scan plus observability metadata.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Identifier for correlating logs with the response.
    pub scan_id: Uuid,
    /// The decision.
    pub outcome: ScanOutcome,
    /// Wall-clock time spanning the whole pipeline.
    pub latency: Duration,
}

impl ScanReport {
    /// Latency in whole milliseconds, as reported to clients.
    pub fn latency_ms(&self) -> u64 {
        self.latency.as_millis() as u64
    }
}
