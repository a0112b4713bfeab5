use std::collections::HashMap;

use super::client::ReferenceStore;
use super::error::RefStoreError;
use super::model::ReferenceEmbedding;

/// In-memory reference store for tests.
#[derive(Default)]
pub struct MockReferenceStore {
    refs: HashMap<i64, Vec<ReferenceEmbedding>>,
    fail: bool,
}

impl MockReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every lookup fails, for upstream-failure paths.
    pub fn failing() -> Self {
        Self {
            refs: HashMap::new(),
            fail: true,
        }
    }

    /// Registers a reference embedding for a building.
    pub fn insert(&mut self, reference: ReferenceEmbedding) {
        self.refs
            .entry(reference.building_id)
            .or_default()
            .push(reference);
    }

    /// Registers a reference vector for a building with default capture metadata.
    pub fn insert_vector(&mut self, building_id: i64, vector: Vec<f32>) {
        self.insert(ReferenceEmbedding {
            building_id,
            angle_deg: 0,
            pitch_deg: 0,
            vector,
            image_key: format!("refs/{building_id}/0.jpg"),
        });
    }
}

impl ReferenceStore for MockReferenceStore {
    async fn embeddings_for(
        &self,
        building_id: i64,
    ) -> Result<Vec<ReferenceEmbedding>, RefStoreError> {
        if self.fail {
            return Err(RefStoreError::LookupFailed {
                building_id,
                message: "simulated outage".to_string(),
            });
        }

        Ok(self.refs.get(&building_id).cloned().unwrap_or_default())
    }
}
