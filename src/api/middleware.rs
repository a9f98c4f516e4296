//! # Utilidades transversales de la API
//!
//! - CORS con credenciales para el frontend
//! - Rechazo uniforme de cuerpos JSON y query strings mal formados
//! - Registro de la cadena completa de errores de almacenamiento

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{error::{JsonPayloadError, QueryPayloadError}, web, HttpRequest};
use std::error::Error as StdError;
use super::AppError;

const PREFLIGHT_MAX_AGE_SECS: usize = 3600;

/// CORS para los orígenes configurados
///
/// Admite credenciales para que el navegador envíe la cookie de sesión. Solo
/// se permiten `GET`, `POST` y `OPTIONS` con cabecera `Content-Type`.
pub fn cors(allowed_origins: &[String]) -> Cors {
    let allowed = allowed_origins.to_vec();
    tracing::debug!(origins = ?allowed, "CORS configured");

    Cors::default()
        .allowed_origin_fn(move |origin, _req| {
            origin
                .to_str()
                .map_or(false, |origin| origin_allowed(&allowed, origin))
        })
        .allowed_methods(["GET", "POST", "OPTIONS"])
        .allowed_header(header::CONTENT_TYPE)
        .supports_credentials()
        .max_age(PREFLIGHT_MAX_AGE_SECS)
}

/// Compara el origen con la lista; `http://host:*` acepta el host con
/// cualquier puerto o sin puerto
fn origin_allowed(allowed: &[String], origin: &str) -> bool {
    allowed.iter().any(|pattern| match pattern.strip_suffix(":*") {
        Some(host) => match origin.strip_prefix(host) {
            Some("") => true,
            Some(rest) => rest
                .strip_prefix(':')
                .map_or(false, |port| !port.is_empty() && port.chars().all(|c| c.is_ascii_digit())),
            None => false,
        },
        None => pattern == origin,
    })
}

/// Configuración del extractor JSON: cualquier fallo de esquema es un 400
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, req: &HttpRequest| {
        tracing::debug!(path = %req.path(), error = %err, "Invalid JSON body");
        AppError::Validation(format!("Invalid request body: {}", err)).into()
    })
}

/// Configuración del extractor de query string
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, req: &HttpRequest| {
        tracing::debug!(path = %req.path(), error = %err, "Invalid query string");
        AppError::Validation(format!("Invalid query: {}", err)).into()
    })
}

/// Registra la cadena completa de errores
///
/// # Parámetros
/// - `error`: Error a analizar y registrar
/// - `context`: Operación durante la que ocurrió
pub fn log_error_chain<E>(error: &E, context: &str)
where
    E: StdError + 'static,
{
    let mut error_chain = Vec::new();
    let mut current_error: Option<&dyn StdError> = Some(error);

    while let Some(err) = current_error {
        error_chain.push(err.to_string());
        current_error = err.source();
    }

    tracing::error!(
        context = %context,
        error_chain = ?error_chain,
        "Error with full chain"
    );
}

/// Extension trait para Results que registra la cadena de errores
///
/// ```ignore
/// collection
///     .insert_one(user)
///     .await
///     .log_error_context("inserting user")?;
/// ```
pub trait ErrorLogExt<T, E> {
    fn log_error_context(self, context: &str) -> Result<T, E>;
}

impl<T, E> ErrorLogExt<T, E> for Result<T, E>
where
    E: StdError + 'static,
{
    fn log_error_context(self, context: &str) -> Result<T, E> {
        if let Err(ref error) = self {
            log_error_chain(error, context);
        }
        self
    }
}
