//! Resource Policy Table
//!
//! Decides, for every remote resource, whether reads are cached and for how
//! long, and which cached keys each write must invalidate.

use std::time::Duration;

use serde::Serialize;

use crate::cache_key;
use crate::config::Config;
use crate::policy::{TtlClass, TtlPolicy};

// == Resource ==
/// A readable resource of the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Collection levels available to one operation id
    RecaudosOperacion,
    /// All lookup tables, including medical-attention scopes and exception
    /// categories
    TablasYDatos,
    /// Programs that can be attached to an agreement
    Programas,
    /// Paginated list of configured agreements
    ConveniosConfigurados,
    /// One configured agreement by id
    ConvenioDetalle,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::RecaudosOperacion,
        Resource::TablasYDatos,
        Resource::Programas,
        Resource::ConveniosConfigurados,
        Resource::ConvenioDetalle,
    ];

    /// Key prefix shared by every cache key of this resource.
    pub fn prefix(self) -> &'static str {
        match self {
            Resource::RecaudosOperacion => "recaudos_operacion",
            Resource::TablasYDatos => "tablas_y_datos",
            Resource::Programas => "programas_convenio_recaudo",
            Resource::ConveniosConfigurados => "convenios_configurados",
            Resource::ConvenioDetalle => "convenio_detalle",
        }
    }

    // == Key Builders ==
    pub fn recaudos_key(operacion_id: &str) -> String {
        cache_key!(Resource::RecaudosOperacion.prefix(), operacion_id)
    }

    pub fn tablas_key() -> String {
        cache_key!(Resource::TablasYDatos.prefix())
    }

    pub fn programas_key() -> String {
        cache_key!(Resource::Programas.prefix())
    }

    pub fn listing_key(pagina: u32, tamano_pagina: u32) -> String {
        cache_key!(Resource::ConveniosConfigurados.prefix(), pagina, tamano_pagina)
    }

    pub fn detail_key(id: i64) -> String {
        cache_key!(Resource::ConvenioDetalle.prefix(), id)
    }
}

// == Cache Policy ==
/// How reads of a resource interact with the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "ttl_class")]
pub enum CachePolicy {
    /// Reads are memoized for the TTL of the class
    Cached(TtlClass),
    /// Reads always go to the remote API
    Bypass,
}

// == Mutation ==
/// A write against configured agreements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// A new configuration; the id is known only if the API echoed it back
    Create { id: Option<i64> },
    Update { id: i64 },
    Deactivate { id: i64 },
}

impl Mutation {
    pub fn id(&self) -> Option<i64> {
        match *self {
            Mutation::Create { id } => id,
            Mutation::Update { id } | Mutation::Deactivate { id } => Some(id),
        }
    }
}

// == Invalidation Plan ==
/// Cache state a write must remove once it has succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationPlan {
    /// Individual keys to delete
    pub keys: Vec<String>,
    /// Resources whose tracked keys must all be deleted
    pub resources: Vec<Resource>,
}

impl InvalidationPlan {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.resources.is_empty()
    }
}

// == Policy Table ==
/// Per-resource caching decisions, auditable in one place.
///
/// | Resource | Default policy |
/// |---|---|
/// | `RecaudosOperacion` | cached, parameterized reference |
/// | `TablasYDatos` | cached, static reference |
/// | `Programas` | cached, static reference |
/// | `ConveniosConfigurados` | bypass (reads after writes must be fresh) |
/// | `ConvenioDetalle` | cached, detail |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTable {
    ttls: TtlPolicy,
    listing: CachePolicy,
}

impl PolicyTable {
    /// Default table with the listing bypassed.
    pub fn new(ttls: TtlPolicy) -> Self {
        Self {
            ttls,
            listing: CachePolicy::Bypass,
        }
    }

    /// Builds the table from configuration; `cache_listings` turns listing
    /// caching on.
    pub fn from_config(config: &Config) -> Self {
        let table = Self::new(TtlPolicy::from_config(config));
        if config.cache_listings {
            table.with_listing_cached()
        } else {
            table
        }
    }

    /// Caches the agreement listing in the `Listing` class. Every write then
    /// also invalidates all listing pages cached so far.
    pub fn with_listing_cached(mut self) -> Self {
        self.listing = CachePolicy::Cached(TtlClass::Listing);
        self
    }

    pub fn policy_for(&self, resource: Resource) -> CachePolicy {
        match resource {
            Resource::RecaudosOperacion => CachePolicy::Cached(TtlClass::ParameterizedReference),
            Resource::TablasYDatos | Resource::Programas => {
                CachePolicy::Cached(TtlClass::StaticReference)
            }
            Resource::ConveniosConfigurados => self.listing,
            Resource::ConvenioDetalle => CachePolicy::Cached(TtlClass::Detail),
        }
    }

    /// TTL for reads of `resource`, or `None` when it bypasses the cache.
    pub fn ttl_for(&self, resource: Resource) -> Option<Duration> {
        match self.policy_for(resource) {
            CachePolicy::Cached(class) => Some(self.ttls.ttl_for(class)),
            CachePolicy::Bypass => None,
        }
    }

    pub fn ttls(&self) -> &TtlPolicy {
        &self.ttls
    }

    // == Invalidation Plan ==
    /// Keys and resources to purge after `mutation` succeeds.
    ///
    /// The affected record's detail key is always removed when its id is
    /// known. Listing pages are removed only when the listing is cached, and
    /// then all of them, since any write can move records between pages.
    pub fn invalidation_plan(&self, mutation: &Mutation) -> InvalidationPlan {
        let mut plan = InvalidationPlan::default();

        if let Some(id) = mutation.id() {
            plan.keys.push(Resource::detail_key(id));
        }
        if matches!(self.listing, CachePolicy::Cached(_)) {
            plan.resources.push(Resource::ConveniosConfigurados);
        }

        plan
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::new(TtlPolicy::default())
    }
}
