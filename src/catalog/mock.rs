use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::geo::haversine_distance_m;

use super::client::CatalogClient;
use super::error::CatalogError;
use super::model::Building;

/// In-memory catalog for tests. Applies the same radius/tier contract as
/// the real service and counts queries so tests can assert that the
/// pipeline short-circuited before reaching the catalog.
#[derive(Default)]
pub struct MockCatalogClient {
    buildings: Vec<Building>,
    query_count: AtomicUsize,
    fail: bool,
    delay: Duration,
}

impl MockCatalogClient {
    pub fn new(buildings: Vec<Building>) -> Self {
        Self {
            buildings,
            query_count: AtomicUsize::new(0),
            fail: false,
            delay: Duration::ZERO,
        }
    }

    /// A catalog whose every query fails, for upstream-failure paths.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    /// Adds simulated lookup latency, for timeout paths.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of `find_within_radius` calls observed.
    pub fn query_count(&self) -> usize {
        self.query_count.load(Ordering::SeqCst)
    }
}

impl CatalogClient for MockCatalogClient {
    async fn find_within_radius(
        &self,
        lat: f64,
        lng: f64,
        radius_m: f64,
        min_tier: i32,
    ) -> Result<Vec<Building>, CatalogError> {
        self.query_count.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if self.fail {
            return Err(CatalogError::Unreachable {
                url: "mock://catalog".to_string(),
                message: "simulated outage".to_string(),
            });
        }

        Ok(self
            .buildings
            .iter()
            .filter(|b| b.tier >= min_tier)
            .filter(|b| haversine_distance_m(lat, lng, b.lat, b.lng) <= radius_m)
            .cloned()
            .collect())
    }
}
