use std::collections::BTreeMap;

use tracing::debug;

use crate::catalog::{Building, CatalogClient, CatalogError};
use crate::config::MatchConfig;

use super::{haversine_distance_m, initial_bearing_deg, within_view_cone};

/// A building that survived geospatial filtering, annotated with its
/// geodesic distance and bearing from the request point.
#[derive(Debug, Clone)]
pub struct NearbyBuilding {
    pub building: Building,
    pub distance_m: f64,
    pub bearing_deg: f64,
}

/// Selects geospatially plausible candidates for one scan.
///
/// The tier gate is pushed down into the catalog query; radius is
/// re-enforced here with a geodesic distance (stores may pre-filter with a
/// coarser index), then the view cone narrows to buildings the camera can
/// physically be facing. Results are deduplicated by building id.
pub struct CandidateSelector<'a, C: CatalogClient> {
    catalog: &'a C,
    config: &'a MatchConfig,
}

impl<'a, C: CatalogClient> CandidateSelector<'a, C> {
    pub fn new(catalog: &'a C, config: &'a MatchConfig) -> Self {
        Self { catalog, config }
    }

    /// Returns candidates around `(lat, lng)` within the configured radius
    /// and view cone. An empty result is a legitimate outcome, not an error.
    pub async fn select(
        &self,
        lat: f64,
        lng: f64,
        heading_deg: f32,
    ) -> Result<Vec<NearbyBuilding>, CatalogError> {
        let fetched = self
            .catalog
            .find_within_radius(lat, lng, self.config.search_radius_m, self.config.min_tier)
            .await?;

        let fetched_count = fetched.len();

        // Dedup by id; the BTreeMap also gives a stable iteration order.
        let mut unique: BTreeMap<i64, Building> = BTreeMap::new();
        for building in fetched {
            unique.entry(building.id).or_insert(building);
        }

        let candidates: Vec<NearbyBuilding> = unique
            .into_values()
            .filter_map(|building| {
                let distance_m = haversine_distance_m(lat, lng, building.lat, building.lng);
                if distance_m > self.config.search_radius_m {
                    return None;
                }

                let bearing_deg = initial_bearing_deg(lat, lng, building.lat, building.lng);
                if !within_view_cone(bearing_deg, heading_deg as f64, self.config.view_cone_deg) {
                    return None;
                }

                Some(NearbyBuilding {
                    building,
                    distance_m,
                    bearing_deg,
                })
            })
            .collect();

        debug!(
            fetched = fetched_count,
            selected = candidates.len(),
            heading_deg,
            cone_deg = self.config.view_cone_deg,
            "Geospatial candidate selection"
        );

        Ok(candidates)
    }
}
