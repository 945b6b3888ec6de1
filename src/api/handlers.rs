//! API Handlers
//!
//! HTTP request handlers for each gateway endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::cache::SharedCache;
use crate::client::{HttpRecaudoApi, RecaudoApi};
use crate::config::Config;
use crate::error::{GatewayError, Result};
use crate::models::{
    ClearResponse, ConfigurarConvenioRecaudoRequest, ConvenioRecaudoConfigurado, ConveniosPage,
    DatoTabla, HealthResponse, ListQuery, Programa, RecaudoOperacion, StatsResponse,
};
use crate::policy::PolicyTable;
use crate::service::ConvenioService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ConvenioService>,
}

impl AppState {
    pub fn new(service: ConvenioService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Wires the cache, the policy table and the given API client from
    /// configuration.
    pub fn with_api(config: &Config, api: Arc<dyn RecaudoApi>) -> Self {
        let cache = SharedCache::with_default_ttl(Duration::from_millis(config.default_ttl_ms));
        let policy = PolicyTable::from_config(config);
        Self::new(ConvenioService::new(api, cache, policy))
    }

    /// Creates a new AppState talking to the remote API over HTTP.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api = HttpRecaudoApi::from_config(config)?;
        Ok(Self::with_api(config, Arc::new(api)))
    }

    /// Shared cache, for background tasks.
    pub fn cache(&self) -> SharedCache {
        self.service.cache().clone()
    }
}

// == Reference Data ==
/// Handler for GET /recaudos/:operacion_id
pub async fn recaudos_handler(
    State(state): State<AppState>,
    Path(operacion_id): Path<String>,
) -> Result<Json<Vec<RecaudoOperacion>>> {
    if operacion_id.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(
            "operacion_id cannot be empty".to_string(),
        ));
    }

    let recaudos = state.service.recaudos_operacion(&operacion_id).await?;
    Ok(Json(recaudos))
}

/// Handler for GET /ambitos
pub async fn ambitos_handler(State(state): State<AppState>) -> Result<Json<Vec<DatoTabla>>> {
    Ok(Json(state.service.ambitos_atencion().await?))
}

/// Handler for GET /excepciones
pub async fn excepciones_handler(State(state): State<AppState>) -> Result<Json<Vec<DatoTabla>>> {
    Ok(Json(state.service.otras_excepciones().await?))
}

/// Handler for GET /programas
pub async fn programas_handler(State(state): State<AppState>) -> Result<Json<Vec<Programa>>> {
    Ok(Json(state.service.programas().await?))
}

// == Configured Agreements ==
/// Handler for GET /convenios
///
/// Paginated listing; `pagina` and `tamano_pagina` default to 1 and 10.
pub async fn list_convenios_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ConveniosPage>> {
    if let Some(error_msg) = query.validate() {
        return Err(GatewayError::InvalidRequest(error_msg));
    }

    let list = state
        .service
        .convenios_configurados(query.pagina, query.tamano_pagina)
        .await?;

    Ok(Json(ConveniosPage::new(
        list.elementos,
        query.pagina,
        query.tamano_pagina,
        list.total_paginas,
    )))
}

/// Handler for POST /convenios
pub async fn create_convenio_handler(
    State(state): State<AppState>,
    Json(req): Json<ConfigurarConvenioRecaudoRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let datos = state.service.configurar_convenio(&req).await?;
    Ok((StatusCode::CREATED, Json(datos)))
}

/// Handler for GET /convenios/:id
pub async fn get_convenio_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ConvenioRecaudoConfigurado>> {
    Ok(Json(state.service.convenio_detalle(id).await?))
}

/// Handler for PUT /convenios/:id
pub async fn update_convenio_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ConfigurarConvenioRecaudoRequest>,
) -> Result<Json<Value>> {
    Ok(Json(state.service.actualizar_convenio(id, req).await?))
}

/// Handler for DELETE /convenios/:id
///
/// Deactivates the agreement; records are never hard-deleted.
pub async fn deactivate_convenio_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    Ok(Json(state.service.desactivar_convenio(id).await?))
}

// == Cache Administration ==
/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.service.cache_stats().await;
    Json(StatsResponse::new(&stats, state.service.policy()))
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let removed = state.service.clear_cache().await;
    Json(ClearResponse::new("Cache cleared", removed))
}

/// Handler for POST /cache/expired
pub async fn clear_expired_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let removed = state.service.clear_expired().await;
    Json(ClearResponse::new("Expired entries removed", removed))
}

/// Handler for GET /health
///
/// Returns the health status of the gateway. It does not contact the remote
/// API.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
