use qdrant_client::qdrant::RetrievedPoint;
use qdrant_client::qdrant::vectors_output::VectorsOptions;
use tracing::debug;

use crate::vectors::{l2_norm, l2_normalize};

/// Tolerance for the unit-norm invariant; vectors further off are
/// renormalized once at the store boundary.
const UNIT_NORM_TOLERANCE: f32 = 1e-3;

/// A precomputed visual fingerprint of a building facade.
#[derive(Debug, Clone)]
pub struct ReferenceEmbedding {
    /// Owning building.
    pub building_id: i64,
    /// Capture compass bearing, degrees `0..=359`.
    pub angle_deg: u16,
    /// Capture pitch, degrees.
    pub pitch_deg: i16,
    /// L2-normalized embedding vector.
    pub vector: Vec<f32>,
    /// Object-storage key of the source image.
    pub image_key: String,
}

impl ReferenceEmbedding {
    /// Builds a validated record from a scrolled Qdrant point.
    ///
    /// Returns `None` for points without a usable vector (zero vector,
    /// missing payload). Non-unit vectors are renormalized; downstream
    /// scoring assumes cosine similarity reduces to a dot product.
    pub fn from_retrieved_point(point: RetrievedPoint) -> Option<Self> {
        let mut vector = match point.vectors.and_then(|v| v.vectors_options) {
            Some(VectorsOptions::Vector(v)) => v.data,
            _ => return None,
        };

        let norm = l2_norm(&vector);
        if norm == 0.0 {
            return None;
        }
        if (norm - 1.0).abs() > UNIT_NORM_TOLERANCE {
            debug!(norm, "Renormalizing off-unit reference vector");
            l2_normalize(&mut vector);
        }

        let payload = point.payload;

        let building_id = payload.get("building_id").and_then(|v| v.as_integer())?;

        let angle_deg = payload
            .get("angle_deg")
            .and_then(|v| v.as_integer())
            .map(|i| (i.rem_euclid(360)) as u16)
            .unwrap_or(0);

        let pitch_deg = payload
            .get("pitch_deg")
            .and_then(|v| v.as_integer())
            .map(|i| i as i16)
            .unwrap_or(0);

        let image_key = payload
            .get("image_key")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_default();

        Some(ReferenceEmbedding {
            building_id,
            angle_deg,
            pitch_deg,
            vector,
            image_key,
        })
    }
}
