use thiserror::Error;

use crate::catalog::CatalogError;
use crate::encoder::EncoderError;
use crate::refstore::RefStoreError;

#[derive(Debug, Error)]
/// Hard failures of the scan pipeline.
///
/// These mean the scan could not be evaluated at all and must not be
/// conflated with `NoMatch` outcomes. Undecodable photos are *not* errors
/// here; they surface as a `NoMatch("invalid photo")` outcome.
pub enum ScanError {
    /// The building catalog could not be queried.
    #[error("catalog unavailable: {0}")]
    Catalog(#[from] CatalogError),

    /// The reference-embedding store could not be queried.
    #[error("reference store unavailable: {0}")]
    RefStore(#[from] RefStoreError),

    /// The encoder failed for a reason other than a bad photo.
    #[error("encoder failed: {0}")]
    Encoder(EncoderError),

    /// A worker task was cancelled or panicked.
    #[error("scan task failed: {0}")]
    Task(String),
}
