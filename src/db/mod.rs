// src/db/mod.rs
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod seed;

pub use self::memory::MemoryStore;
pub use self::mongodb::MongoRepo;
pub use models::{Booking, Review, User, Venue};

use ::mongodb::bson::oid::ObjectId;
use async_trait::async_trait;
use crate::api::AppResult;

/// Capacidad de almacenamiento que usan los handlers.
///
/// Cada operación es una única lectura o escritura; no hay transacciones entre
/// llamadas. Las inserciones devuelven el id asignado al documento.
#[async_trait]
pub trait Store: Send + Sync {
    /// Nombre corto del backend para logs
    fn backend(&self) -> &'static str;

    /// Comprueba que el backend responde
    async fn ping(&self) -> AppResult<()>;

    async fn find_user(&self, id: ObjectId) -> AppResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;
    /// Falla con `Conflict` si el email ya existe y el backend puede detectarlo
    async fn insert_user(&self, user: User) -> AppResult<ObjectId>;

    async fn has_venues(&self) -> AppResult<bool>;
    /// Lista locales en orden de almacenamiento, filtrando por área exacta
    async fn list_venues(&self, area: Option<&str>) -> AppResult<Vec<Venue>>;
    async fn find_venue(&self, id: ObjectId) -> AppResult<Option<Venue>>;
    async fn insert_venue(&self, venue: Venue) -> AppResult<ObjectId>;

    async fn reviews_for_venue(&self, venue_id: ObjectId) -> AppResult<Vec<Review>>;
    async fn insert_review(&self, review: Review) -> AppResult<ObjectId>;

    async fn bookings_for_user(&self, user_id: ObjectId) -> AppResult<Vec<Booking>>;
    async fn insert_booking(&self, booking: Booking) -> AppResult<ObjectId>;
}
