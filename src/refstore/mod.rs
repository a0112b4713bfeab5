//! Reference-embedding store integration (Qdrant).
//!
//! Reference embeddings are precomputed visual fingerprints of building
//! facades, several per building (one per captured angle/pitch). They are
//! written by an offline ingestion job and read-only here.

pub mod client;
pub mod error;
pub mod model;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use client::{QdrantReferenceStore, ReferenceStore};
pub use error::RefStoreError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockReferenceStore;
pub use model::ReferenceEmbedding;

/// Collection holding reference embeddings.
pub const REFERENCE_COLLECTION_NAME: &str = "building_refs";

/// Max reference shots fetched per building. Ingestion caps captures well
/// below this; the limit only guards against a runaway collection.
pub const MAX_REFS_PER_BUILDING: u32 = 64;
