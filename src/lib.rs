//! Recaudo Gateway - caching gateway for the convenio recaudo API
//!
//! Serves the collection-agreement admin front end. Reference data and
//! agreement detail are memoized in a TTL cache according to a per-resource
//! policy, and every successful write invalidates the entries it made stale.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod policy;
pub mod service;
pub mod tasks;

pub use api::AppState;
pub use cache::{create_key, SharedCache};
pub use config::Config;
pub use error::{GatewayError, Result};
pub use policy::PolicyTable;
pub use service::ConvenioService;
pub use tasks::spawn_cleanup_task;
