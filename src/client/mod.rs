//! Remote API Client Module
//!
//! The [`RecaudoApi`] trait is the seam between the caching service and the
//! remote convenio recaudo REST API; [`HttpRecaudoApi`] is its reqwest
//! implementation.

mod http;

pub use http::HttpRecaudoApi;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::models::{
    ActualizarConvenioRecaudoRequest, ApiResponse, ConfigurarConvenioRecaudoRequest,
    ConvenioRecaudoConfigurado, ConvenioRecaudoConfigurationList, Programa, RecaudoOperacion,
    TablaDato,
};

/// Operations offered by the remote API.
///
/// Every method returns the raw response envelope; interpreting `codigo` is
/// left to the caller.
#[async_trait]
pub trait RecaudoApi: Send + Sync {
    /// Collection levels available to an operation id.
    async fn recaudos_operacion(&self, operacion_id: &str)
        -> Result<ApiResponse<Vec<RecaudoOperacion>>>;

    /// Every lookup table with its rows.
    async fn tablas_y_datos(&self) -> Result<ApiResponse<Vec<TablaDato>>>;

    async fn programas_convenio_recaudo(&self) -> Result<ApiResponse<Vec<Programa>>>;

    /// Creates a configuration. The payload echoes whatever the API returns.
    async fn configurar_convenio_recaudo(
        &self,
        request: &ConfigurarConvenioRecaudoRequest,
    ) -> Result<ApiResponse<Value>>;

    async fn convenios_configurados(
        &self,
        pagina: u32,
        tamano_pagina: u32,
    ) -> Result<ApiResponse<ConvenioRecaudoConfigurationList>>;

    async fn convenio_recaudo(&self, id: i64) -> Result<ApiResponse<ConvenioRecaudoConfigurado>>;

    async fn actualizar_convenio_recaudo(
        &self,
        request: &ActualizarConvenioRecaudoRequest,
    ) -> Result<ApiResponse<Value>>;

    async fn desactivar_convenio_recaudo(&self, id: i64) -> Result<ApiResponse<Value>>;
}
