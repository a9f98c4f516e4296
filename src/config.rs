//! Configuración del servidor a partir de variables de entorno.

use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Límite de `SESSION_TTL_HOURS`: un año
const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

/// Frontend publicado y cualquier puerto local
const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "https://cyberverseeeeee.netlify.app",
    "http://localhost:*",
    "http://127.0.0.1:*",
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Valor inválido para {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// Backend de almacenamiento
#[derive(Debug, Clone, PartialEq)]
pub enum StorageBackend {
    MongoDb,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(Self::MongoDb),
            "memory" => Ok(Self::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub storage: StorageBackend,
    /// Sin URI el servicio arranca sin base de datos
    pub mongodb_uri: Option<String>,
    pub mongodb_database: String,
    pub session_ttl_hours: i64,
    pub seed_mock_data: bool,
    /// Orígenes admitidos por CORS; `:*` acepta cualquier puerto
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Lee la configuración del entorno
    ///
    /// # Variables de entorno
    ///
    /// - `BIND_ADDRESS`: Dirección del servidor (default: `0.0.0.0:$PORT`, `PORT` default 5000)
    /// - `STORAGE_BACKEND`: `mongodb` o `memory` (default: mongodb)
    /// - `MONGODB_URI`: URI de MongoDB, sin valor no hay base de datos
    /// - `MONGODB_DATABASE`: Nombre de la base de datos (default: cyberverse)
    /// - `SESSION_TTL_HOURS`: Duración de las sesiones, de 1 a 8760 (default: 24)
    /// - `SEED_MOCK_DATA`: Inserta datos de demostración (default: true)
    /// - `CORS_ORIGINS`: Orígenes separados por comas (default: frontend y localhost)
    pub fn from_env() -> Result<Config, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_address = match lookup("BIND_ADDRESS") {
            Some(address) => address,
            None => {
                let port: u16 = parse_or(&lookup, "PORT", 5000)?;
                format!("0.0.0.0:{}", port)
            }
        };

        let storage = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "STORAGE_BACKEND",
                value,
            })?,
            None => StorageBackend::MongoDb,
        };

        let session_ttl_hours: i64 = parse_or(&lookup, "SESSION_TTL_HOURS", 24)?;
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&session_ttl_hours) {
            return Err(ConfigError::InvalidValue {
                key: "SESSION_TTL_HOURS",
                value: session_ttl_hours.to_string(),
            });
        }

        let cors_origins = match lookup("CORS_ORIGINS") {
            Some(value) => value
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Config {
            bind_address,
            storage,
            mongodb_uri: lookup("MONGODB_URI").filter(|uri| !uri.trim().is_empty()),
            mongodb_database: lookup("MONGODB_DATABASE")
                .unwrap_or_else(|| "cyberverse".to_string()),
            session_ttl_hours,
            seed_mock_data: parse_or(&lookup, "SEED_MOCK_DATA", true)?,
            cors_origins,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}
