//! # Manejo de errores
//!
//! Todos los handlers devuelven [`AppResult`]. Cada variante de [`AppError`]
//! decide su código HTTP y se registra con `tracing` antes de responder con
//! un cuerpo `{"error": "..."}`.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::error::Error;
use thiserror::Error;

/// Tipos de error de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    /// Error de base de datos con la operación que lo produjo
    #[error("{source}")]
    Database {
        operation: String,
        #[source]
        source: mongodb::error::Error,
    },

    /// Cuerpo o parámetros mal formados, o campos requeridos vacíos
    #[error("{0}")]
    Validation(String),

    /// Sin sesión activa o credenciales incorrectas
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    /// Email ya registrado
    #[error("{0}")]
    Conflict(String),

    /// No hay almacenamiento configurado
    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Crea un error de base de datos con contexto de operación
    pub fn database(operation: &str, source: mongodb::error::Error) -> Self {
        Self::Database {
            operation: operation.to_string(),
            source,
        }
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized("Unauthorized".to_string())
    }

    pub fn not_found() -> Self {
        Self::NotFound("Not found".to_string())
    }

    pub fn database_not_connected() -> Self {
        Self::ServiceUnavailable("Database not connected".to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // El email duplicado responde 400, igual que el cliente web espera
            Self::Validation(_) | Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database { .. } | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Database { operation, source } => {
                tracing::error!(
                    operation = %operation,
                    error = %source,
                    error_chain = ?source.source(),
                    "Database error occurred"
                );
            }
            Self::Internal(message) => {
                tracing::error!(message = %message, "Internal error");
            }
            Self::ServiceUnavailable(message) => {
                tracing::warn!(message = %message, "Storage unavailable");
            }
            Self::Unauthorized(message) => {
                tracing::warn!(message = %message, "Unauthorized access attempt");
            }
            Self::Validation(message) | Self::Conflict(message) => {
                tracing::warn!(message = %message, "Rejected request");
            }
            Self::NotFound(message) => {
                tracing::info!(message = %message, "Resource not found");
            }
        }

        // El mensaje del error se devuelve tal cual, también en los 500
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type AppResult<T> = Result<T, AppError>;

impl From<mongodb::error::Error> for AppError {
    fn from(error: mongodb::error::Error) -> Self {
        Self::Database {
            operation: "database_operation".to_string(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::unauthorized().status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::not_found().status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Conflict("Email already exists".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::database_not_connected().status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_internal_error_echoes_message() {
        let response = AppError::Internal("cursor exploded".to_string()).error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "cursor exploded");
    }
}
