//! Convenio Service
//!
//! Binds the cache, the resource policy table and the remote API. Reads are
//! served through the cache according to each resource's policy; writes go
//! straight to the API and then purge what they made stale.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::cache::{CacheStats, SharedCache};
use crate::client::RecaudoApi;
use crate::error::{GatewayError, Result};
use crate::models::{
    datos_de_tabla, ActualizarConvenioRecaudoRequest, ConfigurarConvenioRecaudoRequest,
    ConvenioRecaudoConfigurado, ConvenioRecaudoConfigurationList, DatoTabla, Programa,
    RecaudoOperacion, TablaDato, TABLA_AMBITOS_ATENCION, TABLA_OTRAS_EXCEPCIONES,
};
use crate::policy::{Mutation, PolicyTable, Resource};

// == Convenio Service ==
/// Cached access to the convenio recaudo API.
#[derive(Clone)]
pub struct ConvenioService {
    api: Arc<dyn RecaudoApi>,
    cache: SharedCache,
    policy: PolicyTable,
}

impl ConvenioService {
    pub fn new(api: Arc<dyn RecaudoApi>, cache: SharedCache, policy: PolicyTable) -> Self {
        Self { api, cache, policy }
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    // == Reads ==
    /// Collection levels for an operation id.
    pub async fn recaudos_operacion(&self, operacion_id: &str) -> Result<Vec<RecaudoOperacion>> {
        let key = Resource::recaudos_key(operacion_id);
        self.read(Resource::RecaudosOperacion, &key, || async {
            self.api.recaudos_operacion(operacion_id).await?.into_datos()
        })
        .await
    }

    /// All lookup tables; scopes and exception categories are derived from it.
    pub async fn tablas_y_datos(&self) -> Result<Vec<TablaDato>> {
        let key = Resource::tablas_key();
        self.read(Resource::TablasYDatos, &key, || async {
            self.api.tablas_y_datos().await?.into_datos()
        })
        .await
    }

    /// Medical-attention scopes. Empty when the table is missing.
    pub async fn ambitos_atencion(&self) -> Result<Vec<DatoTabla>> {
        let tablas = self.tablas_y_datos().await?;
        Ok(datos_de_tabla(&tablas, TABLA_AMBITOS_ATENCION))
    }

    /// Exception categories. Empty when the table is missing.
    pub async fn otras_excepciones(&self) -> Result<Vec<DatoTabla>> {
        let tablas = self.tablas_y_datos().await?;
        Ok(datos_de_tabla(&tablas, TABLA_OTRAS_EXCEPCIONES))
    }

    pub async fn programas(&self) -> Result<Vec<Programa>> {
        let key = Resource::programas_key();
        self.read(Resource::Programas, &key, || async {
            self.api.programas_convenio_recaudo().await?.into_datos()
        })
        .await
    }

    /// One page of configured agreements.
    pub async fn convenios_configurados(
        &self,
        pagina: u32,
        tamano_pagina: u32,
    ) -> Result<ConvenioRecaudoConfigurationList> {
        let key = Resource::listing_key(pagina, tamano_pagina);
        self.read(Resource::ConveniosConfigurados, &key, || async {
            self.api
                .convenios_configurados(pagina, tamano_pagina)
                .await?
                .into_datos()
        })
        .await
    }

    pub async fn convenio_detalle(&self, id: i64) -> Result<ConvenioRecaudoConfigurado> {
        let key = Resource::detail_key(id);
        self.read(Resource::ConvenioDetalle, &key, || async {
            self.api.convenio_recaudo(id).await?.into_datos()
        })
        .await
    }

    /// Serves a read according to the resource's policy.
    async fn read<T, F, Fut>(&self, resource: Resource, key: &str, fetch: F) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        match self.policy.ttl_for(resource) {
            Some(ttl) => {
                self.cache
                    .cache_or_fetch_tracked(resource.prefix(), key, ttl, fetch)
                    .await
            }
            None => {
                debug!(key, "Cache bypassed by policy");
                fetch().await
            }
        }
    }

    // == Writes ==
    /// Creates a configuration and returns the API's payload.
    pub async fn configurar_convenio(&self, request: &ConfigurarConvenioRecaudoRequest) -> Result<Value> {
        if let Some(error_msg) = request.validate() {
            return Err(GatewayError::InvalidRequest(error_msg));
        }

        let datos = self
            .api
            .configurar_convenio_recaudo(request)
            .await?
            .ensure_success()?
            .unwrap_or(Value::Null);

        let id = created_id(&datos);
        info!(
            ?id,
            nivel_recaudo_id = request.convenio_recaudo.nivel_recaudo_id,
            "Convenio recaudo configured"
        );
        self.invalidate(Mutation::Create { id }).await;
        Ok(datos)
    }

    pub async fn actualizar_convenio(
        &self,
        id: i64,
        request: ConfigurarConvenioRecaudoRequest,
    ) -> Result<Value> {
        if let Some(error_msg) = request.validate() {
            return Err(GatewayError::InvalidRequest(error_msg));
        }

        let request = ActualizarConvenioRecaudoRequest::from_configuracion(id, request);
        let datos = self
            .api
            .actualizar_convenio_recaudo(&request)
            .await?
            .ensure_success()?
            .unwrap_or(Value::Null);

        info!(id, "Convenio recaudo updated");
        self.invalidate(Mutation::Update { id }).await;
        Ok(datos)
    }

    pub async fn desactivar_convenio(&self, id: i64) -> Result<Value> {
        let datos = self
            .api
            .desactivar_convenio_recaudo(id)
            .await?
            .ensure_success()?
            .unwrap_or(Value::Null);

        info!(id, "Convenio recaudo deactivated");
        self.invalidate(Mutation::Deactivate { id }).await;
        Ok(datos)
    }

    /// Applies the invalidation plan of a successful write.
    async fn invalidate(&self, mutation: Mutation) {
        let plan = self.policy.invalidation_plan(&mutation);
        let mut removed = 0;

        for key in &plan.keys {
            if self.cache.delete(key).await {
                removed += 1;
            }
        }
        for resource in &plan.resources {
            removed += self.cache.invalidate_resource(resource.prefix()).await;
        }

        debug!(?mutation, ?plan, removed, "Applied invalidation plan");
    }

    // == Cache Administration ==
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// Drops every cached entry. Returns how many were removed.
    pub async fn clear_cache(&self) -> usize {
        let removed = self.cache.len().await;
        self.cache.clear().await;
        info!(removed, "Cache cleared");
        removed
    }

    /// Sweeps expired entries now. Returns how many were removed.
    pub async fn clear_expired(&self) -> usize {
        let removed = self.cache.clear_expired().await;
        info!(removed, "Expired cache entries removed");
        removed
    }
}

/// Id of a freshly created record, when the API echoes one back either as
/// the payload itself or as an `id` field.
fn created_id(datos: &Value) -> Option<i64> {
    match datos {
        Value::Number(n) => n.as_i64(),
        Value::Object(map) => map.get("id").and_then(Value::as_i64),
        _ => None,
    }
}
