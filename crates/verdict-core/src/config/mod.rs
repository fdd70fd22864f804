//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `VERDICT_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::time::Duration;

/// Pipeline and server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `VERDICT_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Qdrant collection holding policy chunks. Default: `policy_chunks`.
    pub collection_name: String,

    /// Candidates fetched per retrieval path. Default: `24`.
    pub retrieve_top_k: usize,

    /// Shortlist size after cross-encoder reranking. Default: `8`.
    pub rerank_top_n: usize,

    /// Weight given to the vector signal when fusing scores. Default: `0.7`.
    pub fusion_weight: f32,

    /// Freshness window for the temporal guard, in days. Default: `180`.
    pub freshness_window_days: i64,

    /// Hard maximum source age for the staleness guard, in days. Default: `365`.
    pub max_source_age_days: i64,

    /// Pre-synthesis confidence gate threshold. Default: `0.6`.
    pub confidence_threshold: f32,

    /// Upper bound on escalation ticket creation. Default: `2s`.
    pub ticket_timeout: Duration,

    /// Max cached lexical indices (one per scoping filter). Default: `64`.
    pub lexical_cache_capacity: u64,
}

/// Default Qdrant URL used when `VERDICT_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Default Qdrant collection name.
pub const DEFAULT_COLLECTION_NAME: &str = "policy_chunks";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            retrieve_top_k: 24,
            rerank_top_n: 8,
            fusion_weight: 0.7,
            freshness_window_days: 180,
            max_source_age_days: 365,
            confidence_threshold: 0.6,
            ticket_timeout: Duration::from_secs(2),
            lexical_cache_capacity: 64,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "VERDICT_PORT";
    const ENV_BIND_ADDR: &'static str = "VERDICT_BIND_ADDR";
    const ENV_QDRANT_URL: &'static str = "VERDICT_QDRANT_URL";
    const ENV_COLLECTION_NAME: &'static str = "VERDICT_COLLECTION";
    const ENV_RETRIEVE_TOP_K: &'static str = "VERDICT_RETRIEVE_TOP_K";
    const ENV_RERANK_TOP_N: &'static str = "VERDICT_RERANK_TOP_N";
    const ENV_FUSION_WEIGHT: &'static str = "VERDICT_FUSION_WEIGHT";
    const ENV_FRESHNESS_WINDOW: &'static str = "VERDICT_FRESHNESS_WINDOW_DAYS";
    const ENV_MAX_SOURCE_AGE: &'static str = "VERDICT_MAX_SOURCE_AGE_DAYS";
    const ENV_CONFIDENCE_THRESHOLD: &'static str = "VERDICT_CONFIDENCE_THRESHOLD";
    const ENV_TICKET_TIMEOUT_MS: &'static str = "VERDICT_TICKET_TIMEOUT_MS";
    const ENV_LEXICAL_CACHE_CAPACITY: &'static str = "VERDICT_LEXICAL_CACHE_CAPACITY";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let qdrant_url = Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url);
        let collection_name =
            Self::parse_string_from_env(Self::ENV_COLLECTION_NAME, defaults.collection_name);
        let retrieve_top_k =
            Self::parse_usize_from_env(Self::ENV_RETRIEVE_TOP_K, defaults.retrieve_top_k);
        let rerank_top_n = Self::parse_usize_from_env(Self::ENV_RERANK_TOP_N, defaults.rerank_top_n);
        let fusion_weight =
            Self::parse_f32_from_env(Self::ENV_FUSION_WEIGHT, defaults.fusion_weight);
        let freshness_window_days =
            Self::parse_i64_from_env(Self::ENV_FRESHNESS_WINDOW, defaults.freshness_window_days);
        let max_source_age_days =
            Self::parse_i64_from_env(Self::ENV_MAX_SOURCE_AGE, defaults.max_source_age_days);
        let confidence_threshold =
            Self::parse_f32_from_env(Self::ENV_CONFIDENCE_THRESHOLD, defaults.confidence_threshold);
        let ticket_timeout = env::var(Self::ENV_TICKET_TIMEOUT_MS)
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.ticket_timeout);
        let lexical_cache_capacity = Self::parse_u64_from_env(
            Self::ENV_LEXICAL_CACHE_CAPACITY,
            defaults.lexical_cache_capacity,
        );

        Ok(Self {
            port,
            bind_addr,
            qdrant_url,
            collection_name,
            retrieve_top_k,
            rerank_top_n,
            fusion_weight,
            freshness_window_days,
            max_source_age_days,
            confidence_threshold,
            ticket_timeout,
            lexical_cache_capacity,
        })
    }

    /// Validates basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.fusion_weight) {
            return Err(ConfigError::OutOfRange {
                name: "fusion_weight",
                min: 0.0,
                max: 1.0,
                value: self.fusion_weight,
            });
        }

        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::OutOfRange {
                name: "confidence_threshold",
                min: 0.0,
                max: 1.0,
                value: self.confidence_threshold,
            });
        }

        if self.retrieve_top_k == 0 {
            return Err(ConfigError::ZeroCount {
                name: "retrieve_top_k",
            });
        }

        if self.rerank_top_n == 0 {
            return Err(ConfigError::ZeroCount {
                name: "rerank_top_n",
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
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

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_usize_from_env(var_name: &str, default: usize) -> usize {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_i64_from_env(var_name: &str, default: i64) -> i64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_f32_from_env(var_name: &str, default: f32) -> f32 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}
