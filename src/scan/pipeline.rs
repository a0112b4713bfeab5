use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::try_join_all;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::catalog::CatalogClient;
use crate::config::MatchConfig;
use crate::encoder::FacadeEncoder;
use crate::geo::CandidateSelector;
use crate::refstore::{ReferenceEmbedding, ReferenceStore};
use crate::scoring::{DecisionPolicy, NoMatchReason, ScanOutcome, score_candidate};

use super::error::ScanError;
use super::{ScanReport, ScanRequest};

/// Default capacity of the per-building reference-embedding cache.
pub const DEFAULT_REF_CACHE_CAPACITY: u64 = 2_048;

/// Default TTL of cached reference embeddings.
pub const DEFAULT_REF_CACHE_TTL: Duration = Duration::from_secs(300);

/// End-to-end scan orchestrator.
///
/// Stateless per request; the only cross-request state is the read-through
/// cache of immutable reference embeddings.
pub struct ScanPipeline<C, R>
where
    C: CatalogClient,
    R: ReferenceStore,
{
    encoder: Arc<FacadeEncoder>,
    catalog: C,
    refs: R,
    config: MatchConfig,
    policy: DecisionPolicy,
    ref_cache: moka::sync::Cache<i64, Arc<Vec<ReferenceEmbedding>>>,
}

impl<C, R> ScanPipeline<C, R>
where
    C: CatalogClient,
    R: ReferenceStore,
{
    pub fn new(encoder: Arc<FacadeEncoder>, catalog: C, refs: R, config: MatchConfig) -> Self {
        Self::with_ref_cache(
            encoder,
            catalog,
            refs,
            config,
            DEFAULT_REF_CACHE_CAPACITY,
            DEFAULT_REF_CACHE_TTL,
        )
    }

    pub fn with_ref_cache(
        encoder: Arc<FacadeEncoder>,
        catalog: C,
        refs: R,
        config: MatchConfig,
        cache_capacity: u64,
        cache_ttl: Duration,
    ) -> Self {
        let ref_cache = moka::sync::Cache::builder()
            .max_capacity(cache_capacity)
            .time_to_live(cache_ttl)
            .build();

        let policy = DecisionPolicy::new(config.clone());

        Self {
            encoder,
            catalog,
            refs,
            config,
            policy,
            ref_cache,
        }
    }

    /// Returns the injected catalog handle.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Returns `true` if the encoder runs in stub mode.
    pub fn is_encoder_stub(&self) -> bool {
        self.encoder.is_stub()
    }

    /// Runs one scan end to end.
    ///
    /// Every `Ok` report carries latency, including `NoMatch` outcomes. An
    /// undecodable photo short-circuits before any catalog query. The
    /// candidate evaluation phase runs under the configured timeout budget;
    /// running out of budget yields `NoMatch("timeout")` rather than a
    /// half-finished scoring loop.
    #[instrument(skip(self, request), fields(scan_id = tracing::field::Empty))]
    pub async fn run(&self, request: ScanRequest) -> Result<ScanReport, ScanError> {
        let started = Instant::now();
        let scan_id = Uuid::new_v4();
        tracing::Span::current().record("scan_id", tracing::field::display(scan_id));

        debug!(
            lat = request.lat,
            lng = request.lng,
            heading_deg = request.heading_deg,
            pitch_deg = request.pitch_deg,
            gps_accuracy_m = request.gps_accuracy_m,
            photo_bytes = request.photo.len(),
            "Scan started"
        );

        let ScanRequest {
            photo,
            lat,
            lng,
            heading_deg,
            ..
        } = request;

        // Encoding is CPU/accelerator bound; keep it off the async workers.
        let encoder = Arc::clone(&self.encoder);
        let encoded = tokio::task::spawn_blocking(move || encoder.encode(&photo))
            .await
            .map_err(|e| ScanError::Task(e.to_string()))?;

        let query = match encoded {
            Ok(query) => query,
            Err(e) if e.is_invalid_image() => {
                debug!(error = %e, "Photo rejected before candidate selection");
                return Ok(self.report(
                    scan_id,
                    ScanOutcome::NoMatch {
                        reason: NoMatchReason::InvalidPhoto,
                    },
                    started,
                ));
            }
            Err(e) => return Err(ScanError::Encoder(e)),
        };

        let budget = Duration::from_millis(self.config.scan_timeout_ms);
        let outcome =
            match tokio::time::timeout(budget, self.evaluate(&query, lat, lng, heading_deg)).await
            {
                Ok(result) => result?,
                Err(_) => {
                    warn!(budget_ms = self.config.scan_timeout_ms, "Scan timed out");
                    ScanOutcome::NoMatch {
                        reason: NoMatchReason::Timeout,
                    }
                }
            };

        Ok(self.report(scan_id, outcome, started))
    }

    /// Candidate selection, scoring, and decision (the I/O-bound phase).
    async fn evaluate(
        &self,
        query: &[f32],
        lat: f64,
        lng: f64,
        heading_deg: f32,
    ) -> Result<ScanOutcome, ScanError> {
        let selector = CandidateSelector::new(&self.catalog, &self.config);
        let candidates = selector.select(lat, lng, heading_deg).await?;

        if candidates.is_empty() {
            return Ok(ScanOutcome::NoMatch {
                reason: NoMatchReason::NoBuildingsNearby,
            });
        }

        // Scoring is independent per candidate; only the reference lookups
        // actually suspend.
        let scored = try_join_all(candidates.iter().map(|candidate| async move {
            let references = self.references_for(candidate.building.id).await?;
            Ok::<_, ScanError>(score_candidate(query, candidate, references.as_slice()))
        }))
        .await?;

        let matches = scored.into_iter().flatten().collect();

        Ok(self.policy.decide(matches))
    }

    async fn references_for(
        &self,
        building_id: i64,
    ) -> Result<Arc<Vec<ReferenceEmbedding>>, ScanError> {
        if let Some(cached) = self.ref_cache.get(&building_id) {
            return Ok(cached);
        }

        let references = Arc::new(self.refs.embeddings_for(building_id).await?);
        self.ref_cache.insert(building_id, Arc::clone(&references));
        Ok(references)
    }

    fn report(&self, scan_id: Uuid, outcome: ScanOutcome, started: Instant) -> ScanReport {
        let latency = started.elapsed();

        info!(
            outcome = outcome.debug_status(),
            latency_ms = latency.as_millis() as u64,
            "Scan finished"
        );

        ScanReport {
            scan_id,
            outcome,
            latency,
        }
    }
}
