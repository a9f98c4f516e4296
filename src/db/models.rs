//! Documentos persistidos en el almacenamiento.
//!
//! Los nombres de campo siguen el esquema de las colecciones existentes
//! (`users`, `cafes`, `reviews`, `bookings`), por eso algunos campos Rust se
//! renombran al serializar.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Estado con el que se guarda toda reserva. No existe transición posterior.
pub const BOOKING_CONFIRMED: &str = "Confirmed";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub email: String,
    /// Contraseña tal cual la envió el usuario (sin hash)
    #[serde(rename = "password_hash")]
    pub password: String,
    pub phone: String,
}

/// Local de juego ("cafe" en la API y en la base de datos)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Venue {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub area: String,
    pub price_per_hour: i64,
    pub rating: f64,
    pub distance_km: f64,
    pub image_url: String,
    pub logo_url: String,
    pub travel_info: String,
    pub specs: String,
    /// Lista de juegos separada por comas
    pub games: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Review {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "cafe_id")]
    pub venue_id: ObjectId,
    pub user_id: ObjectId,
    pub rating: i32,
    pub comment: String,
    pub user_name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    #[serde(rename = "cafe_id")]
    pub venue_id: ObjectId,
    #[serde(rename = "cafe_name")]
    pub venue_name: String,
    pub date: String,
    pub time_slot: String,
    pub duration_hours: f64,
    pub total_price: f64,
    pub seat_number: String,
    pub status: String,
}

/// Id de un documento ya persistido, en hexadecimal para la API
pub fn hex_id(id: Option<ObjectId>) -> String {
    id.map(|id| id.to_hex()).unwrap_or_default()
}
