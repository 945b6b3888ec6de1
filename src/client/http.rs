//! HTTP client for the remote convenio recaudo API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::RecaudoApi;
use crate::config::Config;
use crate::error::{GatewayError, Result};
use crate::models::{
    ActualizarConvenioRecaudoRequest, ApiResponse, ConfigurarConvenioRecaudoRequest,
    ConvenioRecaudoConfigurado, ConvenioRecaudoConfigurationList, Programa, RecaudoOperacion,
    TablaDato,
};

/// reqwest-backed [`RecaudoApi`].
///
/// Network failures map to [`GatewayError::Transport`], HTTP error statuses
/// to [`GatewayError::Upstream`] (keeping the API's message when the body is
/// an envelope), and unreadable bodies to [`GatewayError::Decode`].
#[derive(Debug, Clone)]
pub struct HttpRecaudoApi {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpRecaudoApi {
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.api_base_url.clone(),
            config.api_token.clone(),
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, operation: &str, builder: RequestBuilder) -> Result<ApiResponse<T>> {
        let response = builder.send().await.map_err(|e| {
            warn!(operation, error = %e, "Remote request failed");
            GatewayError::Transport(format!("{operation} request failed: {e}"))
        })?;
        debug!(operation, status = %response.status(), "Remote response");

        if !response.status().is_success() {
            return Err(status_error(operation, response).await);
        }

        response
            .json::<ApiResponse<T>>()
            .await
            .map_err(|e| GatewayError::Decode(format!("{operation} response could not be parsed: {e}")))
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        operation: &str,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse<T>> {
        self.send(operation, self.request(method, path).json(body)).await
    }
}

/// Builds the error for a non-2xx response.
async fn status_error(operation: &str, response: Response) -> GatewayError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    match serde_json::from_str::<ApiResponse<Value>>(&body) {
        Ok(envelope) if !envelope.mensaje.is_empty() => GatewayError::Upstream {
            codigo: i64::from(status.as_u16()),
            mensaje: envelope.mensaje,
        },
        _ => GatewayError::Upstream {
            codigo: i64::from(status.as_u16()),
            mensaje: format!("{operation} returned {status}: {body}"),
        },
    }
}

#[async_trait]
impl RecaudoApi for HttpRecaudoApi {
    async fn recaudos_operacion(
        &self,
        operacion_id: &str,
    ) -> Result<ApiResponse<Vec<RecaudoOperacion>>> {
        let builder = self
            .request(Method::GET, "Recaudos/RecaudosOperacion")
            .query(&[("operacionId", operacion_id)]);
        self.send("recaudos_operacion", builder).await
    }

    async fn tablas_y_datos(&self) -> Result<ApiResponse<Vec<TablaDato>>> {
        let builder = self.request(Method::GET, "TablaDato/tablasYDatos");
        self.send("tablas_y_datos", builder).await
    }

    async fn programas_convenio_recaudo(&self) -> Result<ApiResponse<Vec<Programa>>> {
        let builder = self.request(Method::GET, "Programas/programasConvenioRecaudo");
        self.send("programas_convenio_recaudo", builder).await
    }

    async fn configurar_convenio_recaudo(
        &self,
        request: &ConfigurarConvenioRecaudoRequest,
    ) -> Result<ApiResponse<Value>> {
        self.send_json(
            "configurar_convenio_recaudo",
            Method::POST,
            "ConvenioRecaudo/ConfigurarConvenioRecaudo",
            request,
        )
        .await
    }

    async fn convenios_configurados(
        &self,
        pagina: u32,
        tamano_pagina: u32,
    ) -> Result<ApiResponse<ConvenioRecaudoConfigurationList>> {
        let builder = self
            .request(Method::GET, "ConvenioRecaudo/ConvenioRecaudoConfigurados")
            .query(&[("Pagina", pagina), ("TamañoPagina", tamano_pagina)]);
        self.send("convenios_configurados", builder).await
    }

    async fn convenio_recaudo(&self, id: i64) -> Result<ApiResponse<ConvenioRecaudoConfigurado>> {
        let builder = self.request(Method::GET, &format!("ConvenioRecaudo/{id}"));
        self.send("convenio_recaudo", builder).await
    }

    async fn actualizar_convenio_recaudo(
        &self,
        request: &ActualizarConvenioRecaudoRequest,
    ) -> Result<ApiResponse<Value>> {
        self.send_json(
            "actualizar_convenio_recaudo",
            Method::PUT,
            "ConvenioRecaudo/ActualizarConvenioRecaudo",
            request,
        )
        .await
    }

    async fn desactivar_convenio_recaudo(&self, id: i64) -> Result<ApiResponse<Value>> {
        let builder = self.request(
            Method::PUT,
            &format!("ConvenioRecaudo/DesactivarConvenioRecaudo/{id}"),
        );
        self.send("desactivar_convenio_recaudo", builder).await
    }
}
