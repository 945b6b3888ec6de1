//! Configuration Module
//!
//! Handles loading and managing gateway configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// Durations are in milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the remote convenio recaudo API
    pub api_base_url: String,
    /// Bearer token forwarded to the remote API, if any
    pub api_token: Option<String>,
    /// Timeout applied to every remote request
    pub request_timeout_ms: u64,
    /// HTTP server port
    pub server_port: u16,
    /// TTL for entries cached without an explicit one
    pub default_ttl_ms: u64,
    /// TTL for static reference data (lookup catalogs)
    pub static_ttl_ms: u64,
    /// TTL for per-operation reference data
    pub parameterized_ttl_ms: u64,
    /// TTL for paginated listings, when they are cached
    pub listing_ttl_ms: u64,
    /// TTL for single-record detail
    pub detail_ttl_ms: u64,
    /// Whether the configured-agreements listing is cached at all
    pub cache_listings: bool,
    /// Interval between background sweeps of expired entries
    pub sweep_interval_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_BASE_URL` - Remote API base URL (default: http://127.0.0.1:8080/api)
    /// - `API_TOKEN` - Bearer token for the remote API (default: none)
    /// - `REQUEST_TIMEOUT_MS` - Remote request timeout (default: 30000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DEFAULT_TTL_MS` - Default cache TTL (default: 300000)
    /// - `STATIC_TTL_MS` - Static reference TTL (default: 1800000)
    /// - `PARAMETERIZED_TTL_MS` - Parameterized reference TTL (default: 900000)
    /// - `LISTING_TTL_MS` - Listing TTL (default: 300000)
    /// - `DETAIL_TTL_MS` - Detail TTL (default: 120000)
    /// - `CACHE_LISTINGS` - Cache the agreement listing (default: false)
    /// - `SWEEP_INTERVAL_MS` - Expired-entry sweep interval (default: 600000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: env::var("API_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.api_base_url),
            api_token: env::var("API_TOKEN").ok().filter(|v| !v.trim().is_empty()),
            request_timeout_ms: parse_var("REQUEST_TIMEOUT_MS", defaults.request_timeout_ms),
            server_port: parse_var("SERVER_PORT", defaults.server_port),
            default_ttl_ms: parse_var("DEFAULT_TTL_MS", defaults.default_ttl_ms),
            static_ttl_ms: parse_var("STATIC_TTL_MS", defaults.static_ttl_ms),
            parameterized_ttl_ms: parse_var("PARAMETERIZED_TTL_MS", defaults.parameterized_ttl_ms),
            listing_ttl_ms: parse_var("LISTING_TTL_MS", defaults.listing_ttl_ms),
            detail_ttl_ms: parse_var("DETAIL_TTL_MS", defaults.detail_ttl_ms),
            cache_listings: parse_var("CACHE_LISTINGS", defaults.cache_listings),
            sweep_interval_ms: parse_var("SWEEP_INTERVAL_MS", defaults.sweep_interval_ms),
        }
    }
}

/// Reads and parses an environment variable, falling back to `default` when
/// it is unset or unparseable.
fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8080/api".to_string(),
            api_token: None,
            request_timeout_ms: 30_000,
            server_port: 3000,
            default_ttl_ms: 300_000,
            static_ttl_ms: 1_800_000,
            parameterized_ttl_ms: 900_000,
            listing_ttl_ms: 300_000,
            detail_ttl_ms: 120_000,
            cache_listings: false,
            sweep_interval_ms: 600_000,
        }
    }
}
