use serde::{Deserialize, Serialize};

/// A catalog entry. Immutable during a scan; mutated only by offline curation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Stable identifier.
    pub id: i64,
    /// Tax-lot identifier (unique across the catalog).
    pub tax_lot_id: String,
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Centroid latitude.
    pub lat: f64,
    /// Centroid longitude.
    pub lng: f64,
    /// Scan tier; acts as an eligibility gate (candidates need `tier >= min_tier`).
    pub tier: i32,
    /// Landmark flag; grants the landmark boost at ranking time.
    #[serde(default)]
    pub is_landmark: bool,
    /// Optional walk-score metadata carried through from curation.
    #[serde(default)]
    pub walk_score: Option<f32>,
}
