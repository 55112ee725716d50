//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Veredicto de despacho negativo: lista completa de violaciones de negocio
    #[error("Dispatch validation failed: {}", .0.join(" | "))]
    ValidationFailed(Vec<String>),

    /// Transición ilegal en la máquina de estados (error de uso, no de datos)
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// Se perdió la carrera por un recurso compartido
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Database(e) => {
                eprintln!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Database Error".to_string(),
                        message: "An error occurred while accessing the database".to_string(),
                        details: Some(json!({ "sql_error": e.to_string() })),
                        code: Some("DB_ERROR".to_string()),
                    },
                )
            }

            AppError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Validation Error".to_string(),
                    message: "The provided data is invalid".to_string(),
                    details: Some(json!(e)),
                    code: Some("VALIDATION_ERROR".to_string()),
                },
            ),

            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: "Not Found".to_string(),
                    message: msg,
                    details: None,
                    code: Some("NOT_FOUND".to_string()),
                },
            ),

            AppError::ValidationFailed(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Dispatch Validation Failed".to_string(),
                    message: errors.join(" | "),
                    details: Some(json!({ "errors": errors })),
                    code: Some("DISPATCH_VALIDATION_FAILED".to_string()),
                },
            ),

            AppError::InvalidStateTransition(msg) => (
                StatusCode::CONFLICT,
                ErrorResponse {
                    error: "Invalid State Transition".to_string(),
                    message: msg,
                    details: None,
                    code: Some("INVALID_STATE_TRANSITION".to_string()),
                },
            ),

            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorResponse {
                    error: "Conflict".to_string(),
                    message: msg,
                    details: None,
                    code: Some("RESOURCE_CONFLICT".to_string()),
                },
            ),

            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Bad Request".to_string(),
                    message: msg,
                    details: None,
                    code: Some("BAD_REQUEST".to_string()),
                },
            ),

            AppError::Internal(msg) => {
                eprintln!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: msg,
                        details: None,
                        code: Some("INTERNAL_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_failed_display() {
        let err = AppError::ValidationFailed(vec![
            "Vehicle not found".to_string(),
            "Driver license has expired".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Dispatch validation failed: Vehicle not found | Driver license has expired"
        );
    }

    #[test]
    fn test_not_found_display() {
        let err = AppError::NotFound("Trip not found".to_string());
        assert_eq!(err.to_string(), "Not found: Trip not found");
    }
}
