//! Remote API DTOs
//!
//! Mirrors the JSON exchanged with the convenio recaudo REST API. Field names
//! are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result};

// == Envelope ==
/// Envelope wrapping every payload returned by the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Application-level status code, 200 on success
    pub codigo: i64,
    #[serde(default)]
    pub mensaje: String,
    pub datos: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(datos: T) -> Self {
        Self {
            codigo: 200,
            mensaje: "OK".to_string(),
            datos: Some(datos),
        }
    }

    pub fn error(codigo: i64, mensaje: impl Into<String>) -> Self {
        Self {
            codigo,
            mensaje: mensaje.into(),
            datos: None,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.codigo)
    }

    /// Returns the payload, which may be absent, if the envelope reports success.
    pub fn ensure_success(self) -> Result<Option<T>> {
        if self.is_success() {
            Ok(self.datos)
        } else {
            Err(GatewayError::Upstream {
                codigo: self.codigo,
                mensaje: self.mensaje,
            })
        }
    }

    /// Returns the payload of a successful envelope, failing if it is missing.
    pub fn into_datos(self) -> Result<T> {
        self.ensure_success()?
            .ok_or_else(|| GatewayError::Decode("response envelope has no datos".to_string()))
    }
}

// == Reference Data ==
/// A collection level available to an operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecaudoOperacion {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    pub estado: bool,
    pub operacion_id: i64,
    pub fecha_creacion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_modificacion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablaInfo {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub orden: Option<i64>,
    #[serde(default)]
    pub equivalente: Option<String>,
}

/// One row of a lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatoTabla {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub orden: Option<i64>,
    #[serde(default)]
    pub equivalente: Option<String>,
}

/// A lookup table with its rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablaDato {
    pub tabla: TablaInfo,
    #[serde(default)]
    pub datos: Vec<DatoTabla>,
}

/// Name of the lookup table holding medical-attention scopes.
pub const TABLA_AMBITOS_ATENCION: &str = "AmbitosAtencionMedica";
/// Name of the lookup table holding exception categories.
pub const TABLA_OTRAS_EXCEPCIONES: &str = "OtrasExcepcionesRecaudo";

/// Returns the rows of the table called `name`, or nothing if it is missing.
pub fn datos_de_tabla(tablas: &[TablaDato], name: &str) -> Vec<DatoTabla> {
    tablas
        .iter()
        .find(|tabla| tabla.tabla.name == name)
        .map(|tabla| tabla.datos.clone())
        .unwrap_or_default()
}

/// A program that can be attached to an agreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Programa {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub selected: bool,
}

// == Configured Agreements ==
/// A configured agreement as returned by listing and detail endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvenioRecaudoConfigurado {
    pub id: i64,
    pub convenio_id: i64,
    pub nivel_recaudo_id: i64,
    pub fecha_creacion: String,
    #[serde(default)]
    pub fecha_modificacion: Option<String>,
    #[serde(default)]
    pub usuario_id: String,
    pub activo: bool,
    #[serde(default)]
    pub ambito_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub otro_items_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub programa_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub nivel_recaudo_nombre: String,
}

/// One page of configured agreements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvenioRecaudoConfigurationList {
    #[serde(default)]
    pub elementos: Vec<ConvenioRecaudoConfigurado>,
    #[serde(default)]
    pub total_paginas: u32,
}

// == Write Requests ==
fn default_convenio_id() -> i64 {
    1
}

/// Agreement header of a create request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvenioRecaudoNuevo {
    #[serde(default = "default_convenio_id")]
    pub convenio_id: i64,
    pub nivel_recaudo_id: i64,
}

/// Composite configuration submitted to create an agreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurarConvenioRecaudoRequest {
    pub convenio_recaudo: ConvenioRecaudoNuevo,
    #[serde(default)]
    pub ambito_ids: Vec<i64>,
    #[serde(default)]
    pub otro_items_ids: Vec<i64>,
    #[serde(default)]
    pub programa_ids: Vec<i64>,
}

impl ConfigurarConvenioRecaudoRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.convenio_recaudo.nivel_recaudo_id <= 0 {
            return Some("A collection level must be selected".to_string());
        }
        if self.convenio_recaudo.convenio_id <= 0 {
            return Some("convenioId must be positive".to_string());
        }
        None
    }
}

/// Agreement header of an update request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvenioRecaudoExistente {
    pub id: i64,
    pub convenio_id: i64,
    pub nivel_recaudo_id: i64,
}

/// Composite configuration submitted to update an agreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarConvenioRecaudoRequest {
    pub convenio_recaudo: ConvenioRecaudoExistente,
    pub ambito_ids: Vec<i64>,
    pub otro_items_ids: Vec<i64>,
    pub programa_ids: Vec<i64>,
}

impl ActualizarConvenioRecaudoRequest {
    /// Builds the update for record `id` from the same selection a create uses.
    pub fn from_configuracion(id: i64, configuracion: ConfigurarConvenioRecaudoRequest) -> Self {
        Self {
            convenio_recaudo: ConvenioRecaudoExistente {
                id,
                convenio_id: configuracion.convenio_recaudo.convenio_id,
                nivel_recaudo_id: configuracion.convenio_recaudo.nivel_recaudo_id,
            },
            ambito_ids: configuracion.ambito_ids,
            otro_items_ids: configuracion.otro_items_ids,
            programa_ids: configuracion.programa_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_success() {
        let response: ApiResponse<Vec<Programa>> = serde_json::from_value(json!({
            "codigo": 200,
            "mensaje": "OK",
            "datos": [{"id": 1, "name": "PyP"}]
        }))
        .unwrap();

        let datos = response.into_datos().unwrap();
        assert_eq!(datos.len(), 1);
        assert!(!datos[0].selected);
    }

    #[test]
    fn test_envelope_failure_code() {
        let response: ApiResponse<Vec<Programa>> = serde_json::from_value(json!({
            "codigo": 500,
            "mensaje": "Error interno",
            "datos": null
        }))
        .unwrap();

        assert_eq!(
            response.into_datos(),
            Err(GatewayError::Upstream {
                codigo: 500,
                mensaje: "Error interno".to_string()
            })
        );
    }

    #[test]
    fn test_envelope_missing_datos() {
        let response: ApiResponse<i64> =
            serde_json::from_value(json!({"codigo": 200, "mensaje": "OK"})).unwrap();

        assert!(matches!(response.clone().into_datos(), Err(GatewayError::Decode(_))));
        assert_eq!(response.ensure_success(), Ok(None));
    }

    #[test]
    fn test_configurado_camel_case() {
        let convenio: ConvenioRecaudoConfigurado = serde_json::from_value(json!({
            "id": 3,
            "convenioId": 1,
            "nivelRecaudoId": 12,
            "fechaCreacion": "2025-01-10T12:00:00",
            "fechaModificacion": null,
            "usuarioId": "u-1",
            "activo": true,
            "ambitoIds": [1, 2],
            "otroItemsIds": null,
            "programaIds": [9],
            "nivelRecaudoNombre": "Cuota moderadora"
        }))
        .unwrap();

        assert_eq!(convenio.nivel_recaudo_id, 12);
        assert_eq!(convenio.ambito_ids, Some(vec![1, 2]));
        assert_eq!(convenio.otro_items_ids, None);
    }

    #[test]
    fn test_datos_de_tabla() {
        let tablas: Vec<TablaDato> = serde_json::from_value(json!([
            {"tabla": {"id": 1, "name": "AmbitosAtencionMedica", "orden": null, "equivalente": null},
             "datos": [{"id": 10, "name": "Urgencias", "orden": 1, "equivalente": null}]},
            {"tabla": {"id": 2, "name": "OtrasExcepcionesRecaudo", "orden": null, "equivalente": null},
             "datos": []}
        ]))
        .unwrap();

        assert_eq!(datos_de_tabla(&tablas, TABLA_AMBITOS_ATENCION)[0].name, "Urgencias");
        assert!(datos_de_tabla(&tablas, TABLA_OTRAS_EXCEPCIONES).is_empty());
        assert!(datos_de_tabla(&tablas, "Inexistente").is_empty());
    }

    #[test]
    fn test_configurar_request_defaults_and_wire_shape() {
        let request: ConfigurarConvenioRecaudoRequest = serde_json::from_value(json!({
            "convenioRecaudo": {"nivelRecaudoId": 4},
            "ambitoIds": [1]
        }))
        .unwrap();

        assert_eq!(request.convenio_recaudo.convenio_id, 1);
        assert!(request.programa_ids.is_empty());
        assert!(request.validate().is_none());

        let wire = serde_json::to_value(&request).unwrap();
        assert_eq!(wire["convenioRecaudo"]["nivelRecaudoId"], 4);
        assert_eq!(wire["otroItemsIds"], json!([]));
    }

    #[test]
    fn test_configurar_request_requires_level() {
        let request = ConfigurarConvenioRecaudoRequest {
            convenio_recaudo: ConvenioRecaudoNuevo {
                convenio_id: 1,
                nivel_recaudo_id: 0,
            },
            ambito_ids: vec![],
            otro_items_ids: vec![],
            programa_ids: vec![],
        };
        assert!(request.validate().is_some());
    }

    #[test]
    fn test_actualizar_from_configuracion() {
        let request = ConfigurarConvenioRecaudoRequest {
            convenio_recaudo: ConvenioRecaudoNuevo {
                convenio_id: 2,
                nivel_recaudo_id: 5,
            },
            ambito_ids: vec![1],
            otro_items_ids: vec![2],
            programa_ids: vec![3],
        };

        let update = ActualizarConvenioRecaudoRequest::from_configuracion(8, request);
        let wire = serde_json::to_value(&update).unwrap();

        assert_eq!(wire["convenioRecaudo"], json!({"id": 8, "convenioId": 2, "nivelRecaudoId": 5}));
        assert_eq!(wire["programaIds"], json!([3]));
    }
}
