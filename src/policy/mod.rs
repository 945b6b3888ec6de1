//! Cache Policy Module
//!
//! TTL classes, the per-resource cache policy table and the invalidation
//! plans applied after writes.

mod table;
mod ttl;

pub use table::{CachePolicy, InvalidationPlan, Mutation, PolicyTable, Resource};
pub use ttl::{TtlClass, TtlPolicy};
