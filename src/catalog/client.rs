use serde::Serialize;
use tracing::debug;

use super::error::CatalogError;
use super::model::Building;

/// Minimal async interface to the building catalog.
///
/// Implementations return buildings whose centroid lies within
/// `radius_m` of the point and whose tier is `>= min_tier`. Order is
/// unspecified; duplicates are the caller's problem to collapse.
pub trait CatalogClient: Send + Sync {
    /// Finds candidate buildings around a point.
    fn find_within_radius(
        &self,
        lat: f64,
        lng: f64,
        radius_m: f64,
        min_tier: i32,
    ) -> impl std::future::Future<Output = Result<Vec<Building>, CatalogError>> + Send;
}

#[derive(Clone)]
/// HTTP client for the catalog service (`GET /buildings/nearby`).
pub struct RestCatalogClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct NearbyQuery {
    lat: f64,
    lng: f64,
    radius_m: f64,
    min_tier: i32,
}

impl RestCatalogClient {
    /// Creates a client for the catalog at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Performs a basic health check request.
    pub async fn health_check(&self) -> Result<(), CatalogError> {
        let url = format!("{}/healthz", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Unreachable {
                url: url.clone(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(CatalogError::QueryFailed {
                status: response.status().as_u16(),
                message: "health check failed".to_string(),
            });
        }

        Ok(())
    }
}

impl CatalogClient for RestCatalogClient {
    async fn find_within_radius(
        &self,
        lat: f64,
        lng: f64,
        radius_m: f64,
        min_tier: i32,
    ) -> Result<Vec<Building>, CatalogError> {
        let url = format!("{}/buildings/nearby", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&NearbyQuery {
                lat,
                lng,
                radius_m,
                min_tier,
            })
            .send()
            .await
            .map_err(|e| CatalogError::Unreachable {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::QueryFailed {
                status: status.as_u16(),
                message,
            });
        }

        let buildings: Vec<Building> =
            response
                .json()
                .await
                .map_err(|e| CatalogError::InvalidResponse {
                    message: e.to_string(),
                })?;

        debug!(count = buildings.len(), radius_m, min_tier, "Catalog query returned");

        Ok(buildings)
    }
}
