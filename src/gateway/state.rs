use std::sync::Arc;

use crate::catalog::CatalogClient;
use crate::refstore::ReferenceStore;
use crate::scan::ScanPipeline;

pub struct HandlerState<C, R>
where
    C: CatalogClient + 'static,
    R: ReferenceStore + 'static,
{
    pub pipeline: Arc<ScanPipeline<C, R>>,
}

impl<C, R> Clone for HandlerState<C, R>
where
    C: CatalogClient + 'static,
    R: ReferenceStore + 'static,
{
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}

impl<C, R> HandlerState<C, R>
where
    C: CatalogClient + 'static,
    R: ReferenceStore + 'static,
{
    pub fn new(pipeline: Arc<ScanPipeline<C, R>>) -> Self {
        Self { pipeline }
    }
}
