//! Similarity scoring and the ranking/decision policy.
//!
//! A candidate building carries several reference embeddings (one per
//! captured angle/pitch); the scorer reduces them to a single best score
//! with a max over pairwise dot products. The user's photo usually
//! resembles only one capture angle closely, so the max (not a mean) is
//! what disambiguates buildings.
//!
//! [`DecisionPolicy`] then applies deterministic multiplicative boosts,
//! orders candidates reproducibly, and maps the ranking to a
//! [`ScanOutcome`].

pub mod policy;
pub mod scorer;
pub mod types;


pub use policy::DecisionPolicy;
pub use scorer::{best_reference_score, score_candidate};
pub use types::{Alternate, BestReference, CandidateMatch, NoMatchReason, ScanOutcome};
