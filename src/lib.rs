//! Sightline library crate (used by the server binary and integration tests).
//!
//! # Pipeline
//!
//! One scan request flows through four stages:
//!
//! 1. [`FacadeEncoder`] turns the photo into a unit vector.
//! 2. [`CandidateSelector`] finds geospatially plausible buildings.
//! 3. [`scoring`] ranks candidates against their reference embeddings.
//! 4. [`DecisionPolicy`] picks a [`ScanOutcome`].
//!
//! [`ScanPipeline`] sequences the stages and attaches wall-clock latency to
//! every outcome. The catalog and reference-embedding store are injected as
//! trait handles so the pipeline can run against fakes in tests.
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod catalog;
pub mod config;
pub mod encoder;
pub mod gateway;
pub mod geo;
pub mod refstore;
pub mod scan;
pub mod scoring;
pub mod vectors;

pub use catalog::{Building, CatalogClient, CatalogError, RestCatalogClient};
#[cfg(any(test, feature = "mock"))]
pub use catalog::MockCatalogClient;

pub use config::{Config, ConfigError, MatchConfig};
pub use encoder::{EncoderConfig, EncoderError, FacadeEncoder};
pub use geo::{
    CandidateSelector, NearbyBuilding, angular_difference_deg, haversine_distance_m,
    initial_bearing_deg, within_view_cone,
};
pub use refstore::{QdrantReferenceStore, RefStoreError, ReferenceEmbedding, ReferenceStore};
#[cfg(any(test, feature = "mock"))]
pub use refstore::MockReferenceStore;

pub use scan::{ScanError, ScanPipeline, ScanReport, ScanRequest};
pub use scoring::{
    Alternate, CandidateMatch, DecisionPolicy, NoMatchReason, ScanOutcome, best_reference_score,
};
pub use vectors::{dot, l2_norm, l2_normalize};
