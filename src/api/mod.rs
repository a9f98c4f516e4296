//! # Módulo API
//!
//! Rutas y controladores de la API REST.
//!
//! ## Módulos principales
//!
//! - [`auth`] - Registro, login y logout de usuarios
//! - [`cafe`] - Listado y detalle de locales
//! - [`review`] - Publicación de reseñas
//! - [`booking`] - Creación y listado de reservas
//! - [`health`] - Índice del servicio y estado
//! - [`session`] - Sesiones por cookie
//! - [`errors`] - Manejo de errores de la aplicación

pub mod auth;
pub mod booking;
pub mod cafe;
pub mod errors;
pub mod health;
pub mod middleware;
pub mod review;
pub mod session;

pub use errors::{AppError, AppResult};
pub use session::{SessionContext, SessionStore};

use actix_web::web;
use serde::Serialize;
use std::sync::Arc;
use crate::db::Store;

/// Estado compartido por todos los workers
pub struct AppState {
    store: Option<Arc<dyn Store>>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(store: Option<Arc<dyn Store>>, sessions: SessionStore) -> Self {
        Self { store, sessions }
    }

    /// Almacenamiento configurado, o `503` si el servicio arrancó sin él
    pub fn store(&self) -> AppResult<&dyn Store> {
        self.store
            .as_deref()
            .ok_or_else(AppError::database_not_connected)
    }
}

/// Respuesta simple `{"message": ...}`
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Configura todas las rutas de la API
///
/// ## Rutas configuradas
///
/// - `/` y `/api/health` - Ver [`health::routes`]
/// - `/api/auth/*` - Ver [`auth::routes`]
/// - `/api/cafes`, `/api/cafe/{id}` - Ver [`cafe::routes`]
/// - `/api/reviews` - Ver [`review::routes`]
/// - `/api/book`, `/api/user/bookings` - Ver [`booking::routes`]
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(middleware::json_config());
    cfg.app_data(middleware::query_config());

    health::routes(cfg);
    auth::routes(cfg);
    cafe::routes(cfg);
    review::routes(cfg);
    booking::routes(cfg);
}
