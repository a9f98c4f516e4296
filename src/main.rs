//! # Cyberverse Server
//!
//! Backend de reservas para locales de juego (cafés gaming) construido con
//! Rust, Actix Web y MongoDB.
//!
//! ## Características principales
//!
//! - **Usuarios**: Registro, login y logout con sesión por cookie
//! - **Catálogo**: Listado de locales con filtros por área y precio
//! - **Reseñas**: Los usuarios autenticados pueden valorar un local
//! - **Reservas**: Reserva de un puesto (`PC-01`..`PC-20`) en un local
//! - **Datos demo**: Quince locales y un usuario demo si la base está vacía
//!
//! ## Configuración
//!
//! El servidor se configura mediante variables de entorno (archivo `.env`):
//!
//! ```env
//! # Base de datos MongoDB
//! MONGODB_URI=mongodb://localhost:27017
//! MONGODB_DATABASE=cyberverse
//!
//! # mongodb | memory
//! STORAGE_BACKEND=mongodb
//!
//! # Servidor
//! BIND_ADDRESS=0.0.0.0:5000
//! SESSION_TTL_HOURS=24
//! CORS_ORIGINS=https://cyberverseeeeee.netlify.app,http://localhost:*
//!
//! # Logging
//! RUST_LOG=debug,mongodb=info
//! ```
//!
//! Sin `MONGODB_URI` (o si la conexión falla) el servidor arranca igualmente
//! y los endpoints de datos responden `503`.
//!
//! ## Arquitectura
//!
//! ```text
//! Cliente web
//!     ↓ HTTP/JSON + cookie de sesión
//! API REST (Actix Web)
//!     ↓ trait Store
//! MongoDB | memoria
//! ```

use actix_web::{middleware::Logger, web, App, HttpServer};
use std::sync::Arc;

mod api;
mod config;
mod db;

use api::{AppState, SessionStore};
use config::{Config, StorageBackend};
use db::{MemoryStore, MongoRepo, Store};

/// Abre el almacenamiento configurado.
///
/// Un fallo de conexión no detiene el servidor: se registra y se continúa sin
/// almacenamiento.
async fn open_store(config: &Config) -> Option<Arc<dyn Store>> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("Usando almacenamiento en memoria, los datos se pierden al reiniciar");
            Some(Arc::new(MemoryStore::new()) as Arc<dyn Store>)
        }
        StorageBackend::MongoDb => {
            let Some(uri) = config.mongodb_uri.as_deref() else {
                tracing::warn!("MONGODB_URI no configurado, los endpoints de datos responderán 503");
                return None;
            };

            match MongoRepo::init(uri, &config.mongodb_database).await {
                Ok(repo) => {
                    // No es un error fatal, continuamos sin índices
                    if let Err(e) = repo.create_indexes().await {
                        tracing::warn!("Advertencia creando índices: {}", e);
                    }
                    Some(Arc::new(repo) as Arc<dyn Store>)
                }
                Err(e) => {
                    tracing::error!("Error conectando a MongoDB: {}", e);
                    None
                }
            }
        }
    }
}

/// Función principal que inicia el servidor web
///
/// 1. Carga variables de entorno desde `.env`
/// 2. Configura el logging con tracing
/// 3. Abre el almacenamiento y siembra los datos demo
/// 4. Arranca el servidor HTTP con las rutas de la API
///
/// # Errores
///
/// Retorna `std::io::Error` si la configuración es inválida o no se puede
/// bindear la dirección.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cyberverse=debug,mongodb=info")),
        )
        .init();

    let config = Config::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    tracing::info!(storage = ?config.storage, "Iniciando Cyberverse Server...");

    let store = open_store(&config).await;

    if let Some(store) = &store {
        if config.seed_mock_data {
            if let Err(e) = db::seed::seed_mock_data(store.as_ref()).await {
                tracing::warn!("Advertencia sembrando datos demo: {}", e);
            }
        }
    }

    let state = web::Data::new(AppState::new(
        store,
        SessionStore::new(config.session_ttl_hours),
    ));

    tracing::info!("Servidor iniciando en {}", config.bind_address);

    let cors_origins = config.cors_origins.clone();

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(api::middleware::cors(&cors_origins))
            .wrap(Logger::default())
            .configure(api::init_routes)
    })
        .bind(&config.bind_address)?
        .run()
        .await
}
