use serde::Serialize;

use crate::catalog::Building;

/// The reference shot that produced a candidate's best score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestReference {
    /// Capture compass bearing, degrees.
    pub angle_deg: u16,
    /// Capture pitch, degrees.
    pub pitch_deg: i16,
    /// Dot product against the query vector.
    pub score: f32,
}

/// A transient scoring result for one candidate building.
#[derive(Debug, Clone)]
pub struct CandidateMatch {
    /// The candidate.
    pub building: Building,
    /// Best raw similarity in `[-1, 1]` (practically `[0, 1]`), before boosts.
    pub raw_score: f32,
    /// Which reference embedding produced the best score.
    pub best_reference: BestReference,
    /// Geodesic distance from the request point to the centroid, meters.
    pub distance_m: f64,
}

/// A ranked candidate surfaced in an outcome, carrying its boosted score.
#[derive(Debug, Clone, Serialize)]
pub struct Alternate {
    /// The candidate.
    pub building: Building,
    /// Boosted score used for ranking.
    pub score: f32,
    /// Geodesic distance to the centroid, meters.
    pub distance_m: f64,
}

/// Why a scan produced no confident match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoMatchReason {
    /// Photo bytes could not be decoded; user-actionable.
    InvalidPhoto,
    /// The geospatial query returned nothing.
    NoBuildingsNearby,
    /// Candidates existed but none could be scored (no reference imagery).
    NoMatchesFound,
    /// Scoring succeeded but the best boosted score missed the threshold.
    BelowConfidence,
    /// The scan exceeded its time budget.
    Timeout,
}

impl NoMatchReason {
    /// Human-readable reason string reported to the client.
    pub fn as_str(&self) -> &'static str {
        match self {
            NoMatchReason::InvalidPhoto => "invalid photo",
            NoMatchReason::NoBuildingsNearby => "no buildings nearby",
            NoMatchReason::NoMatchesFound => "no matches found",
            NoMatchReason::BelowConfidence => "below confidence threshold",
            NoMatchReason::Timeout => "timeout",
        }
    }
}

impl std::fmt::Display for NoMatchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The decision result for one scan.
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    /// A single confident match.
    Matched {
        /// The winning building.
        building: Building,
        /// Boosted score of the winner.
        confidence: f32,
        /// Runner-ups, highest first (up to `max_candidates - 1`).
        alternates: Vec<Alternate>,
    },
    /// Several candidates cleared the threshold too close to call.
    Ambiguous {
        /// Top candidates, highest first (up to `max_candidates`).
        candidates: Vec<Alternate>,
    },
    /// No confident match.
    NoMatch {
        /// Why.
        reason: NoMatchReason,
    },
}

impl ScanOutcome {
    /// Returns `true` for a single confident match.
    pub fn is_matched(&self) -> bool {
        matches!(self, ScanOutcome::Matched { .. })
    }

    /// Returns the winning confidence (if matched).
    pub fn confidence(&self) -> Option<f32> {
        match self {
            ScanOutcome::Matched { confidence, .. } => Some(*confidence),
            _ => None,
        }
    }

    /// Returns a short debug label.
    pub fn debug_status(&self) -> &'static str {
        match self {
            ScanOutcome::Matched { .. } => "MATCHED",
            ScanOutcome::Ambiguous { .. } => "AMBIGUOUS",
            ScanOutcome::NoMatch { .. } => "NO_MATCH",
        }
    }
}

impl std::fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanOutcome::Matched {
                building,
                confidence,
                ..
            } => write!(f, "MATCHED ({}, score: {:.4})", building.name, confidence),
            ScanOutcome::Ambiguous { candidates } => {
                write!(f, "AMBIGUOUS ({} candidates)", candidates.len())
            }
            ScanOutcome::NoMatch { reason } => write!(f, "NO_MATCH ({})", reason),
        }
    }
}
