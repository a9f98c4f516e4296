use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::{Client, Collection, Database};
use serde::de::DeserializeOwned;
use crate::api::middleware::ErrorLogExt;
use crate::api::{AppError, AppResult};
use super::models::{Booking, Review, User, Venue};
use super::Store;

/// Código de MongoDB para violación de índice único
const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, Clone)]
pub struct MongoRepo {
    pub client: Client,
    pub database: Database,
}

impl MongoRepo {
    /// Conecta con MongoDB y valida la conexión con un `ping`
    pub async fn init(uri: &str, database_name: &str) -> AppResult<MongoRepo> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| AppError::database("connect", e))?;

        let database = client.database(database_name);

        database
            .run_command(doc! {"ping": 1})
            .await
            .map_err(|e| AppError::database("ping", e))?;

        tracing::info!(database = %database_name, "Conexión a MongoDB establecida exitosamente");

        Ok(MongoRepo { client, database })
    }

    pub fn users(&self) -> Collection<User> {
        self.database.collection("users")
    }

    pub fn venues(&self) -> Collection<Venue> {
        self.database.collection("cafes")
    }

    pub fn reviews(&self) -> Collection<Review> {
        self.database.collection("reviews")
    }

    pub fn bookings(&self) -> Collection<Booking> {
        self.database.collection("bookings")
    }

    /// Crea los índices de las consultas por campo
    pub async fn create_indexes(&self) -> AppResult<()> {
        use mongodb::{options::IndexOptions, IndexModel};

        self.users()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build(),
            )
            .await
            .map_err(|e| AppError::database("create_index_users", e))?;

        self.venues()
            .create_index(IndexModel::builder().keys(doc! { "area": 1 }).build())
            .await
            .map_err(|e| AppError::database("create_index_cafes", e))?;

        self.reviews()
            .create_index(IndexModel::builder().keys(doc! { "cafe_id": 1 }).build())
            .await
            .map_err(|e| AppError::database("create_index_reviews", e))?;

        self.bookings()
            .create_index(IndexModel::builder().keys(doc! { "user_id": 1 }).build())
            .await
            .map_err(|e| AppError::database("create_index_bookings", e))?;

        tracing::info!("Índices MongoDB creados exitosamente");
        Ok(())
    }
}

/// Lee todos los documentos que cumplen el filtro, en orden natural
async fn collect<T>(collection: &Collection<T>, filter: Document, operation: &str) -> AppResult<Vec<T>>
where
    T: DeserializeOwned + Send + Sync,
{
    let mut cursor = collection
        .find(filter)
        .await
        .log_error_context(operation)
        .map_err(|e| AppError::database(operation, e))?;

    let mut results = Vec::new();
    while cursor
        .advance()
        .await
        .map_err(|e| AppError::database(operation, e))?
    {
        let item = cursor
            .deserialize_current()
            .map_err(|e| AppError::database(operation, e))?;
        results.push(item);
    }

    Ok(results)
}

fn inserted_id(id: Bson) -> AppResult<ObjectId> {
    id.as_object_id()
        .ok_or_else(|| AppError::Internal(format!("Unexpected inserted id: {}", id)))
}

fn is_duplicate_code(code: i32) -> bool {
    code == DUPLICATE_KEY
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if is_duplicate_code(e.code)
    )
}

#[async_trait]
impl Store for MongoRepo {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn ping(&self) -> AppResult<()> {
        self.database
            .run_command(doc! {"ping": 1})
            .await
            .map_err(|e| AppError::database("ping", e))?;
        Ok(())
    }

    async fn find_user(&self, id: ObjectId) -> AppResult<Option<User>> {
        self.users()
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::database("find_user", e))
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.users()
            .find_one(doc! { "email": email })
            .await
            .log_error_context("looking up user by email")
            .map_err(|e| AppError::database("find_user_by_email", e))
    }

    async fn insert_user(&self, user: User) -> AppResult<ObjectId> {
        let result = self.users().insert_one(user).await;

        match result {
            Ok(result) => inserted_id(result.inserted_id),
            Err(e) if is_duplicate_key(&e) => {
                Err(AppError::Conflict("Email already exists".to_string()))
            }
            Err(e) => {
                crate::api::middleware::log_error_chain(&e, "inserting new user");
                Err(AppError::database("insert_user", e))
            }
        }
    }

    async fn has_venues(&self) -> AppResult<bool> {
        let first = self
            .venues()
            .find_one(doc! {})
            .await
            .map_err(|e| AppError::database("has_venues", e))?;
        Ok(first.is_some())
    }

    async fn list_venues(&self, area: Option<&str>) -> AppResult<Vec<Venue>> {
        let mut filter = doc! {};
        if let Some(area) = area {
            filter.insert("area", area);
        }
        collect(&self.venues(), filter, "list_venues").await
    }

    async fn find_venue(&self, id: ObjectId) -> AppResult<Option<Venue>> {
        self.venues()
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::database("find_venue", e))
    }

    async fn insert_venue(&self, venue: Venue) -> AppResult<ObjectId> {
        let result = self
            .venues()
            .insert_one(venue)
            .await
            .log_error_context("inserting venue")
            .map_err(|e| AppError::database("insert_venue", e))?;
        inserted_id(result.inserted_id)
    }

    async fn reviews_for_venue(&self, venue_id: ObjectId) -> AppResult<Vec<Review>> {
        collect(&self.reviews(), doc! { "cafe_id": venue_id }, "reviews_for_venue").await
    }

    async fn insert_review(&self, review: Review) -> AppResult<ObjectId> {
        let result = self
            .reviews()
            .insert_one(review)
            .await
            .log_error_context("inserting review")
            .map_err(|e| AppError::database("insert_review", e))?;
        inserted_id(result.inserted_id)
    }

    async fn bookings_for_user(&self, user_id: ObjectId) -> AppResult<Vec<Booking>> {
        collect(&self.bookings(), doc! { "user_id": user_id }, "bookings_for_user").await
    }

    async fn insert_booking(&self, booking: Booking) -> AppResult<ObjectId> {
        let result = self
            .bookings()
            .insert_one(booking)
            .await
            .log_error_context("inserting booking")
            .map_err(|e| AppError::database("insert_booking", e))?;
        inserted_id(result.inserted_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_duplicate_key_code_is_conflict() {
        assert!(is_duplicate_code(11000));
        for code in [0, 2, 11001, 112, -11000] {
            assert!(!is_duplicate_code(code), "{}", code);
        }
    }

    #[test]
    fn test_non_write_error_is_not_duplicate() {
        let error = mongodb::error::Error::custom("boom");
        assert!(!is_duplicate_key(&error));
    }
}
