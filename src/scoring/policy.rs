use std::cmp::Ordering;

use tracing::debug;

use crate::config::MatchConfig;

use super::types::{Alternate, CandidateMatch, NoMatchReason, ScanOutcome};

/// Ranks scored candidates and decides the scan outcome.
pub struct DecisionPolicy {
    config: MatchConfig,
}

struct RankedMatch {
    candidate: CandidateMatch,
    boosted_score: f32,
}

impl DecisionPolicy {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    /// Returns the configured confidence threshold.
    pub fn confidence_threshold(&self) -> f32 {
        self.config.confidence_threshold
    }

    /// Boosted score for one candidate.
    ///
    /// Both boosts multiply the *raw* base score; they never compound on an
    /// already-boosted value, keeping each boost interpretable and testable
    /// independently. Applying this twice to the same candidate yields the
    /// same number.
    pub fn boosted_score(&self, candidate: &CandidateMatch) -> f32 {
        let mut factor = 1.0;

        if candidate.building.is_landmark {
            factor *= self.config.landmark_boost;
        }

        if candidate.distance_m < self.config.proximity_threshold_m {
            factor *= self.config.proximity_boost;
        }

        candidate.raw_score * factor
    }

    /// Decides the outcome for a set of scored candidates.
    ///
    /// Ordering is deterministic: boosted score descending, then geodesic
    /// distance ascending, then building id ascending. An empty input is a
    /// `NoMatch("no matches found")`, never a panic.
    pub fn decide(&self, candidates: Vec<CandidateMatch>) -> ScanOutcome {
        if candidates.is_empty() {
            return ScanOutcome::NoMatch {
                reason: NoMatchReason::NoMatchesFound,
            };
        }

        let mut ranked: Vec<RankedMatch> = candidates
            .into_iter()
            .map(|candidate| RankedMatch {
                boosted_score: self.boosted_score(&candidate),
                candidate,
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.boosted_score
                .partial_cmp(&a.boosted_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    a.candidate
                        .distance_m
                        .partial_cmp(&b.candidate.distance_m)
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| a.candidate.building.id.cmp(&b.candidate.building.id))
        });

        let top = &ranked[0];

        debug!(
            building_id = top.candidate.building.id,
            raw_score = top.candidate.raw_score,
            boosted_score = top.boosted_score,
            threshold = self.config.confidence_threshold,
            candidates = ranked.len(),
            "Ranked candidates"
        );

        if top.boosted_score < self.config.confidence_threshold {
            return ScanOutcome::NoMatch {
                reason: NoMatchReason::BelowConfidence,
            };
        }

        let too_close = ranked.get(1).is_some_and(|second| {
            second.boosted_score >= self.config.confidence_threshold
                && top.boosted_score - second.boosted_score < self.config.ambiguity_margin
        });

        if too_close {
            let candidates = ranked
                .into_iter()
                .take(self.config.max_candidates)
                .map(alternate)
                .collect();

            return ScanOutcome::Ambiguous { candidates };
        }

        let mut ranked = ranked.into_iter();
        // Non-empty checked above.
        let winner = ranked.next().expect("ranked candidates are non-empty");
        let confidence = winner.boosted_score;
        let building = winner.candidate.building;

        let alternates = ranked
            .take(self.config.max_candidates.saturating_sub(1))
            .map(alternate)
            .collect();

        ScanOutcome::Matched {
            building,
            confidence,
            alternates,
        }
    }
}

fn alternate(ranked: RankedMatch) -> Alternate {
    Alternate {
        score: ranked.boosted_score,
        distance_m: ranked.candidate.distance_m,
        building: ranked.candidate.building,
    }
}
