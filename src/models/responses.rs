//! Response DTOs for the gateway API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::models::ConvenioRecaudoConfigurado;
use crate::policy::{CachePolicy, PolicyTable, Resource};

/// Number of page links shown around the current page.
pub const MAX_VISIBLE_PAGES: u32 = 5;

/// Page numbers to offer around `current`, at most `max` of them.
///
/// The window is centred on the current page and shifted so it stays within
/// `1..=total`. Returns nothing when there are no pages.
pub fn visible_pages(current: u32, total: u32, max: u32) -> Vec<u32> {
    if total == 0 || max == 0 {
        return Vec::new();
    }
    let (current, total, max) = (i64::from(current), i64::from(total), i64::from(max));

    let mut inicio = (current - max / 2).max(1);
    let fin = (inicio + max - 1).min(total);
    if fin - inicio + 1 < max {
        inicio = (fin - max + 1).max(1);
    }

    (inicio..=fin).filter_map(|page| u32::try_from(page).ok()).collect()
}

/// Response body for `GET /convenios`
#[derive(Debug, Clone, Serialize)]
pub struct ConveniosPage {
    pub elementos: Vec<ConvenioRecaudoConfigurado>,
    pub pagina: u32,
    pub tamano_pagina: u32,
    pub total_paginas: u32,
    /// Page numbers to render as direct links
    pub paginas_visibles: Vec<u32>,
}

impl ConveniosPage {
    pub fn new(
        elementos: Vec<ConvenioRecaudoConfigurado>,
        pagina: u32,
        tamano_pagina: u32,
        total_paginas: u32,
    ) -> Self {
        Self {
            elementos,
            pagina,
            tamano_pagina,
            total_paginas,
            paginas_visibles: visible_pages(pagina, total_paginas, MAX_VISIBLE_PAGES),
        }
    }
}

/// Caching policy of one resource, as reported by the stats endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ResourcePolicyView {
    pub resource: Resource,
    pub prefix: &'static str,
    pub policy: CachePolicy,
    /// TTL in milliseconds, absent when reads bypass the cache
    pub ttl_ms: Option<u64>,
}

/// Response body for `GET /cache/stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub invalidations: u64,
    /// Current number of entries, including expired ones not yet swept
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    pub policies: Vec<ResourcePolicyView>,
    /// Time the stats were taken, ISO 8601
    pub timestamp: String,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics and the policy table
    pub fn new(stats: &CacheStats, table: &PolicyTable) -> Self {
        let policies = Resource::ALL
            .iter()
            .map(|&resource| ResourcePolicyView {
                resource,
                prefix: resource.prefix(),
                policy: table.policy_for(resource),
                ttl_ms: table
                    .ttl_for(resource)
                    .map(|ttl| u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)),
            })
            .collect();

        Self {
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            invalidations: stats.invalidations,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
            policies,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response body for the cache cleanup endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    /// Number of entries removed
    pub removed: usize,
}

impl ClearResponse {
    pub fn new(message: impl Into<String>, removed: usize) -> Self {
        Self {
            message: message.into(),
            removed,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
