//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `SIGHTLINE_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SIGHTLINE_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Base URL of the building catalog service. Default: `http://localhost:9000`.
    pub catalog_url: String,

    /// Qdrant endpoint URL holding reference embeddings. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Path to the CLIP vision model weights (safetensors). Stub encoder when unset.
    pub model_path: Option<PathBuf>,

    /// Max buildings cached in the reference-embedding cache. Default: `2_048`.
    pub ref_cache_capacity: u64,

    /// TTL for cached reference embeddings, seconds. Default: `300`.
    pub ref_cache_ttl_secs: u64,

    /// Matching parameters shared with the scan pipeline.
    pub matching: MatchConfig,
}

/// Tunables of the matching core. Every value is externally configurable;
/// none are hardcoded in the pipeline.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Geodesic search radius around the request point, meters. Default: `150.0`.
    pub search_radius_m: f64,

    /// Full view-cone angle centered on the device heading, degrees.
    /// `>= 360` disables cone filtering. Default: `120.0`.
    pub view_cone_deg: f64,

    /// Minimum scan tier a building needs to be eligible. Default: `1`.
    pub min_tier: i32,

    /// Max candidates surfaced in an outcome (winner + alternates). Default: `3`.
    pub max_candidates: usize,

    /// Minimum boosted score required for a `Matched` outcome. Default: `0.70`.
    pub confidence_threshold: f32,

    /// Multiplicative boost for landmark-flagged candidates. Default: `1.05`.
    pub landmark_boost: f32,

    /// Candidates closer than this (meters) receive the proximity boost. Default: `25.0`.
    pub proximity_threshold_m: f64,

    /// Multiplicative boost for candidates inside the proximity threshold. Default: `1.10`.
    pub proximity_boost: f32,

    /// If the runner-up also clears the threshold and trails the winner by
    /// less than this margin, the outcome is `Ambiguous`. Default: `0.02`.
    pub ambiguity_margin: f32,

    /// Budget for candidate selection + scoring + decision, milliseconds.
    /// Elapsed budget yields a `NoMatch("timeout")` outcome. Default: `8_000`.
    pub scan_timeout_ms: u64,
}

/// Default catalog URL used when `SIGHTLINE_CATALOG_URL` is not set.
pub const DEFAULT_CATALOG_URL: &str = "http://localhost:9000";

/// Default Qdrant URL used when `SIGHTLINE_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            model_path: None,
            ref_cache_capacity: 2_048,
            ref_cache_ttl_secs: 300,
            matching: MatchConfig::default(),
        }
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            search_radius_m: 150.0,
            view_cone_deg: 120.0,
            min_tier: 1,
            max_candidates: 3,
            confidence_threshold: 0.70,
            landmark_boost: 1.05,
            proximity_threshold_m: 25.0,
            proximity_boost: 1.10,
            ambiguity_margin: 0.02,
            scan_timeout_ms: 8_000,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "SIGHTLINE_PORT";
    const ENV_BIND_ADDR: &'static str = "SIGHTLINE_BIND_ADDR";
    const ENV_CATALOG_URL: &'static str = "SIGHTLINE_CATALOG_URL";
    const ENV_QDRANT_URL: &'static str = "SIGHTLINE_QDRANT_URL";
    const ENV_MODEL_PATH: &'static str = "SIGHTLINE_MODEL_PATH";
    const ENV_REF_CACHE_CAPACITY: &'static str = "SIGHTLINE_REF_CACHE_CAPACITY";
    const ENV_REF_CACHE_TTL_SECS: &'static str = "SIGHTLINE_REF_CACHE_TTL_SECS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let catalog_url = Self::parse_string_from_env(Self::ENV_CATALOG_URL, defaults.catalog_url);
        let qdrant_url = Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url);
        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);
        let ref_cache_capacity =
            parse_from_env(Self::ENV_REF_CACHE_CAPACITY, defaults.ref_cache_capacity)?;
        let ref_cache_ttl_secs =
            parse_from_env(Self::ENV_REF_CACHE_TTL_SECS, defaults.ref_cache_ttl_secs)?;
        let matching = MatchConfig::from_env()?;

        Ok(Self {
            port,
            bind_addr,
            catalog_url,
            qdrant_url,
            model_path,
            ref_cache_capacity,
            ref_cache_ttl_secs,
            matching,
        })
    }

    /// Validates paths and basic invariants (does not touch the network).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        self.matching.validate()
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|_| ConfigError::InvalidNumber {
                    var: Self::ENV_PORT,
                    value: value.clone(),
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }
}

impl MatchConfig {
    const ENV_SEARCH_RADIUS_M: &'static str = "SIGHTLINE_SEARCH_RADIUS_M";
    const ENV_VIEW_CONE_DEG: &'static str = "SIGHTLINE_VIEW_CONE_DEG";
    const ENV_MIN_TIER: &'static str = "SIGHTLINE_MIN_TIER";
    const ENV_MAX_CANDIDATES: &'static str = "SIGHTLINE_MAX_CANDIDATES";
    const ENV_CONFIDENCE_THRESHOLD: &'static str = "SIGHTLINE_CONFIDENCE_THRESHOLD";
    const ENV_LANDMARK_BOOST: &'static str = "SIGHTLINE_LANDMARK_BOOST";
    const ENV_PROXIMITY_THRESHOLD_M: &'static str = "SIGHTLINE_PROXIMITY_THRESHOLD_M";
    const ENV_PROXIMITY_BOOST: &'static str = "SIGHTLINE_PROXIMITY_BOOST";
    const ENV_AMBIGUITY_MARGIN: &'static str = "SIGHTLINE_AMBIGUITY_MARGIN";
    const ENV_SCAN_TIMEOUT_MS: &'static str = "SIGHTLINE_SCAN_TIMEOUT_MS";

    /// Loads matching parameters from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            search_radius_m: parse_from_env(Self::ENV_SEARCH_RADIUS_M, defaults.search_radius_m)?,
            view_cone_deg: parse_from_env(Self::ENV_VIEW_CONE_DEG, defaults.view_cone_deg)?,
            min_tier: parse_from_env(Self::ENV_MIN_TIER, defaults.min_tier)?,
            max_candidates: parse_from_env(Self::ENV_MAX_CANDIDATES, defaults.max_candidates)?,
            confidence_threshold: parse_from_env(
                Self::ENV_CONFIDENCE_THRESHOLD,
                defaults.confidence_threshold,
            )?,
            landmark_boost: parse_from_env(Self::ENV_LANDMARK_BOOST, defaults.landmark_boost)?,
            proximity_threshold_m: parse_from_env(
                Self::ENV_PROXIMITY_THRESHOLD_M,
                defaults.proximity_threshold_m,
            )?,
            proximity_boost: parse_from_env(Self::ENV_PROXIMITY_BOOST, defaults.proximity_boost)?,
            ambiguity_margin: parse_from_env(
                Self::ENV_AMBIGUITY_MARGIN,
                defaults.ambiguity_margin,
            )?,
            scan_timeout_ms: parse_from_env(Self::ENV_SCAN_TIMEOUT_MS, defaults.scan_timeout_ms)?,
        })
    }

    /// Rejects value combinations the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search_radius_m <= 0.0 {
            return Err(ConfigError::OutOfRange {
                name: "search_radius_m",
                reason: "must be positive".to_string(),
            });
        }

        if self.max_candidates == 0 {
            return Err(ConfigError::OutOfRange {
                name: "max_candidates",
                reason: "must be at least 1".to_string(),
            });
        }

        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::OutOfRange {
                name: "confidence_threshold",
                reason: "must be within [0, 1]".to_string(),
            });
        }

        if self.landmark_boost < 1.0 || self.proximity_boost < 1.0 {
            return Err(ConfigError::OutOfRange {
                name: "boost factors",
                reason: "boosts are nudges upward; factors below 1.0 invert the ranking"
                    .to_string(),
            });
        }

        if self.scan_timeout_ms == 0 {
            return Err(ConfigError::OutOfRange {
                name: "scan_timeout_ms",
                reason: "must be positive".to_string(),
            });
        }

        Ok(())
    }
}

fn parse_from_env<T: std::str::FromStr>(var_name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var_name) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidNumber {
            var: var_name,
            value,
        }),
        Err(_) => Ok(default),
    }
}
