use tracing::debug;

use crate::geo::NearbyBuilding;
use crate::refstore::ReferenceEmbedding;
use crate::vectors::dot;

use super::types::{BestReference, CandidateMatch};

/// Best-of-k reduction over a candidate's reference embeddings.
///
/// Both sides are unit vectors, so cosine similarity is a dot product.
/// Returns `None` for an empty reference set: a building without imagery
/// cannot be matched yet and is dropped silently, not an error.
pub fn best_reference_score(
    query: &[f32],
    references: &[ReferenceEmbedding],
) -> Option<BestReference> {
    references
        .iter()
        .map(|reference| BestReference {
            angle_deg: reference.angle_deg,
            pitch_deg: reference.pitch_deg,
            score: dot(query, &reference.vector),
        })
        .max_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Scores one geospatial candidate against its reference embeddings.
pub fn score_candidate(
    query: &[f32],
    candidate: &NearbyBuilding,
    references: &[ReferenceEmbedding],
) -> Option<CandidateMatch> {
    let best = best_reference_score(query, references)?;

    debug!(
        building_id = candidate.building.id,
        score = best.score,
        angle_deg = best.angle_deg,
        references = references.len(),
        "Scored candidate"
    );

    Some(CandidateMatch {
        building: candidate.building.clone(),
        raw_score: best.score,
        best_reference: best,
        distance_m: candidate.distance_m,
    })
}
