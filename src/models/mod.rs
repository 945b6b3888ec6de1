//! Request and Response models
//!
//! This module defines the DTOs (Data Transfer Objects) exchanged with the
//! remote API and with gateway clients.

pub mod api;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use api::{
    datos_de_tabla, ActualizarConvenioRecaudoRequest, ApiResponse,
    ConfigurarConvenioRecaudoRequest, ConvenioRecaudoConfigurado,
    ConvenioRecaudoConfigurationList, ConvenioRecaudoExistente, ConvenioRecaudoNuevo, DatoTabla,
    Programa, RecaudoOperacion, TablaDato, TablaInfo, TABLA_AMBITOS_ATENCION,
    TABLA_OTRAS_EXCEPCIONES,
};
pub use requests::ListQuery;
pub use responses::{
    visible_pages, ClearResponse, ConveniosPage, ErrorResponse, HealthResponse,
    ResourcePolicyView, StatsResponse,
};
