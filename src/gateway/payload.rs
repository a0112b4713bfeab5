use serde::Serialize;
use uuid::Uuid;

use crate::catalog::Building;
use crate::scan::ScanReport;
use crate::scoring::{Alternate, ScanOutcome};

/// Wire shape of a scan response (tagged by `result`).
#[derive(Debug, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ScanResponse {
    Matched {
        building: BuildingDto,
        confidence: f32,
        alternates: Vec<AlternateDto>,
        latency_ms: u64,
        scan_id: Uuid,
    },
    Ambiguous {
        candidates: Vec<AlternateDto>,
        latency_ms: u64,
        scan_id: Uuid,
    },
    NoMatch {
        reason: &'static str,
        latency_ms: u64,
        scan_id: Uuid,
    },
}

#[derive(Debug, Serialize)]
pub struct BuildingDto {
    pub id: i64,
    pub tax_lot_id: String,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub is_landmark: bool,
}

#[derive(Debug, Serialize)]
pub struct AlternateDto {
    pub building: BuildingDto,
    pub score: f32,
    pub distance_m: f64,
}

impl From<Building> for BuildingDto {
    fn from(b: Building) -> Self {
        Self {
            id: b.id,
            tax_lot_id: b.tax_lot_id,
            name: b.name,
            address: b.address,
            lat: b.lat,
            lng: b.lng,
            is_landmark: b.is_landmark,
        }
    }
}

impl From<Alternate> for AlternateDto {
    fn from(a: Alternate) -> Self {
        Self {
            building: a.building.into(),
            score: a.score,
            distance_m: a.distance_m,
        }
    }
}

impl ScanResponse {
    /// Shapes a pipeline report for the wire.
    pub fn from_report(report: ScanReport) -> Self {
        let latency_ms = report.latency_ms();
        let scan_id = report.scan_id;

        match report.outcome {
            ScanOutcome::Matched {
                building,
                confidence,
                alternates,
            } => ScanResponse::Matched {
                building: building.into(),
                confidence,
                alternates: alternates.into_iter().map(Into::into).collect(),
                latency_ms,
                scan_id,
            },
            ScanOutcome::Ambiguous { candidates } => ScanResponse::Ambiguous {
                candidates: candidates.into_iter().map(Into::into).collect(),
                latency_ms,
                scan_id,
            },
            ScanOutcome::NoMatch { reason } => ScanResponse::NoMatch {
                reason: reason.as_str(),
                latency_ms,
                scan_id,
            },
        }
    }

    /// Outcome label carried in the [`OUTCOME_HEADER`](super::OUTCOME_HEADER) header.
    pub fn outcome_label(&self) -> &'static str {
        match self {
            ScanResponse::Matched { .. } => "matched",
            ScanResponse::Ambiguous { .. } => "ambiguous",
            ScanResponse::NoMatch { .. } => "no_match",
        }
    }
}
