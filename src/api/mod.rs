//! API Module
//!
//! HTTP handlers and routing for the gateway REST API. Reference data and
//! agreement endpoints go through [`ConvenioService`](crate::service::ConvenioService);
//! the `/cache` endpoints administer the shared cache directly.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
