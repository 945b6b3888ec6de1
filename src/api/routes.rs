//! API Routes
//!
//! Configures the Axum router with all gateway endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    ambitos_handler, clear_cache_handler, clear_expired_handler, create_convenio_handler,
    deactivate_convenio_handler, excepciones_handler, get_convenio_handler, health_handler,
    list_convenios_handler, programas_handler, recaudos_handler, stats_handler,
    update_convenio_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /recaudos/:operacion_id` - Collection levels of an operation
/// - `GET /ambitos` - Medical-attention scopes
/// - `GET /excepciones` - Exception categories
/// - `GET /programas` - Programs
/// - `GET /convenios` - Paginated configured agreements
/// - `POST /convenios` - Configure a new agreement
/// - `GET /convenios/:id` - Agreement detail
/// - `PUT /convenios/:id` - Update an agreement
/// - `DELETE /convenios/:id` - Deactivate an agreement
/// - `GET /cache/stats` - Cache statistics and policies
/// - `DELETE /cache` - Drop every cached entry
/// - `POST /cache/expired` - Sweep expired entries now
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/recaudos/:operacion_id", get(recaudos_handler))
        .route("/ambitos", get(ambitos_handler))
        .route("/excepciones", get(excepciones_handler))
        .route("/programas", get(programas_handler))
        .route(
            "/convenios",
            get(list_convenios_handler).post(create_convenio_handler),
        )
        .route(
            "/convenios/:id",
            get(get_convenio_handler)
                .put(update_convenio_handler)
                .delete(deactivate_convenio_handler),
        )
        .route("/cache/stats", get(stats_handler))
        .route("/cache", delete(clear_cache_handler))
        .route("/cache/expired", post(clear_expired_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    // Points at a closed port; only routes that never reach the API are used.
    fn create_test_app() -> Router {
        let config = Config {
            api_base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_ms: 200,
            ..Config::default()
        };
        create_router(AppState::from_config(&config).unwrap())
    }

    async fn status_of(method: &str, uri: &str) -> StatusCode {
        create_test_app()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        assert_eq!(status_of("GET", "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        assert_eq!(status_of("GET", "/cache/stats").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cache_admin_endpoints() {
        assert_eq!(status_of("DELETE", "/cache").await, StatusCode::OK);
        assert_eq!(status_of("POST", "/cache/expired").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_page_rejected_before_remote_call() {
        assert_eq!(
            status_of("GET", "/convenios?pagina=0").await,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_non_numeric_id_rejected() {
        assert_eq!(
            status_of("GET", "/convenios/abc").await,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_unreachable_api_maps_to_bad_gateway() {
        assert_eq!(status_of("GET", "/programas").await, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        assert_eq!(status_of("GET", "/nonexistent").await, StatusCode::NOT_FOUND);
    }
}
