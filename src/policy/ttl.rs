//! TTL Classes
//!
//! Groups remote resources by how long their data may be served from cache.

use std::time::Duration;

use serde::Serialize;

use crate::config::Config;

// == TTL Class ==
/// Staleness tolerance of a family of resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TtlClass {
    /// Lookup catalogs that rarely change
    StaticReference,
    /// Reference data keyed by a caller-supplied parameter
    ParameterizedReference,
    /// Paginated listings
    Listing,
    /// A single record fetched by id
    Detail,
}

// == TTL Policy ==
/// One TTL per [`TtlClass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub static_reference: Duration,
    pub parameterized_reference: Duration,
    pub listing: Duration,
    pub detail: Duration,
}

impl TtlPolicy {
    /// Builds the policy from the configured per-class TTLs.
    pub fn from_config(config: &Config) -> Self {
        Self {
            static_reference: Duration::from_millis(config.static_ttl_ms),
            parameterized_reference: Duration::from_millis(config.parameterized_ttl_ms),
            listing: Duration::from_millis(config.listing_ttl_ms),
            detail: Duration::from_millis(config.detail_ttl_ms),
        }
    }

    pub fn ttl_for(&self, class: TtlClass) -> Duration {
        match class {
            TtlClass::StaticReference => self.static_reference,
            TtlClass::ParameterizedReference => self.parameterized_reference,
            TtlClass::Listing => self.listing,
            TtlClass::Detail => self.detail,
        }
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            static_reference: Duration::from_secs(30 * 60),
            parameterized_reference: Duration::from_secs(15 * 60),
            listing: Duration::from_secs(5 * 60),
            detail: Duration::from_secs(2 * 60),
        }
    }
}
