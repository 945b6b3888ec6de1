//! Error types for the gateway
//!
//! Provides unified error handling using thiserror. Cache misses are not
//! errors and never appear here.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Gateway Error Enum ==
/// Unified error type for the gateway.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The remote API answered with a non-success envelope
    #[error("Upstream error {codigo}: {mensaje}")]
    Upstream { codigo: i64, mensaje: String },

    /// The remote API could not be reached or returned a failing HTTP status
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote API answered with a body that could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Internal gateway error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// HTTP status reported to gateway clients for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Upstream { codigo: 404, .. } => StatusCode::NOT_FOUND,
            GatewayError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            GatewayError::Transport(_) | GatewayError::Decode(_) => StatusCode::BAD_GATEWAY,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the gateway.
pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_error_status_codes() {
        let test_cases = vec![
            (GatewayError::NotFound("7".to_string()), StatusCode::NOT_FOUND),
            (GatewayError::InvalidRequest("bad".to_string()), StatusCode::BAD_REQUEST),
            (
                GatewayError::Upstream { codigo: 404, mensaje: "no existe".to_string() },
                StatusCode::NOT_FOUND,
            ),
            (
                GatewayError::Upstream { codigo: 500, mensaje: "fallo".to_string() },
                StatusCode::BAD_GATEWAY,
            ),
            (GatewayError::Transport("down".to_string()), StatusCode::BAD_GATEWAY),
            (GatewayError::Decode("json".to_string()), StatusCode::BAD_GATEWAY),
            (GatewayError::Internal("error".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(
                response.status(),
                expected_status,
                "Error should map to correct HTTP status"
            );
        }
    }

    #[tokio::test]
    async fn test_error_body_format() {
        let error = GatewayError::Upstream {
            codigo: 500,
            mensaje: "Error interno".to_string(),
        };
        let expected = error.to_string();

        let response = error.into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["error"].as_str(), Some(expected.as_str()));
        assert!(expected.contains("Error interno"));
    }
}
