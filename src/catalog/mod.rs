//! Building catalog access.
//!
//! The catalog is an external read-only collaborator: it owns building
//! geometries and curation state. This module pins its wire contract to a
//! typed [`Building`] record and exposes the lookup behind the
//! [`CatalogClient`] trait so the pipeline can run against fakes.

pub mod client;
pub mod error;
pub mod model;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use client::{CatalogClient, RestCatalogClient};
pub use error::CatalogError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockCatalogClient;
pub use model::Building;
