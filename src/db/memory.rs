//! Almacenamiento en memoria del proceso.
//!
//! Se usa en los tests de la API y con `STORAGE_BACKEND=memory` para levantar
//! el servidor sin MongoDB. Mantiene el orden de inserción.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;
use crate::api::{AppError, AppResult};
use super::models::{Booking, Review, User, Venue};
use super::Store;

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    venues: Vec<Venue>,
    reviews: Vec<Review>,
    bookings: Vec<Booking>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn find_user(&self, id: ObjectId) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == Some(id)).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, mut user: User) -> AppResult<ObjectId> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let id = ObjectId::new();
        user.id = Some(id);
        inner.users.push(user);
        Ok(id)
    }

    async fn has_venues(&self) -> AppResult<bool> {
        Ok(!self.inner.read().await.venues.is_empty())
    }

    async fn list_venues(&self, area: Option<&str>) -> AppResult<Vec<Venue>> {
        let inner = self.inner.read().await;
        Ok(inner
            .venues
            .iter()
            .filter(|v| area.map_or(true, |area| v.area == area))
            .cloned()
            .collect())
    }

    async fn find_venue(&self, id: ObjectId) -> AppResult<Option<Venue>> {
        let inner = self.inner.read().await;
        Ok(inner.venues.iter().find(|v| v.id == Some(id)).cloned())
    }

    async fn insert_venue(&self, mut venue: Venue) -> AppResult<ObjectId> {
        let id = ObjectId::new();
        venue.id = Some(id);
        self.inner.write().await.venues.push(venue);
        Ok(id)
    }

    async fn reviews_for_venue(&self, venue_id: ObjectId) -> AppResult<Vec<Review>> {
        let inner = self.inner.read().await;
        Ok(inner
            .reviews
            .iter()
            .filter(|r| r.venue_id == venue_id)
            .cloned()
            .collect())
    }

    async fn insert_review(&self, mut review: Review) -> AppResult<ObjectId> {
        let id = ObjectId::new();
        review.id = Some(id);
        self.inner.write().await.reviews.push(review);
        Ok(id)
    }

    async fn bookings_for_user(&self, user_id: ObjectId) -> AppResult<Vec<Booking>> {
        let inner = self.inner.read().await;
        Ok(inner
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_booking(&self, mut booking: Booking) -> AppResult<ObjectId> {
        let id = ObjectId::new();
        booking.id = Some(id);
        self.inner.write().await.bookings.push(booking);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    fn user(email: &str) -> User {
        User {
            id: None,
            username: "Tester".to_string(),
            email: email.to_string(),
            password: "secret".to_string(),
            phone: "000".to_string(),
        }
    }

    fn venue(name: &str, area: &str) -> Venue {
        Venue {
            id: None,
            name: name.to_string(),
            area: area.to_string(),
            price_per_hour: 200,
            rating: 4.2,
            distance_km: 1.5,
            image_url: String::new(),
            logo_url: String::new(),
            travel_info: String::new(),
            specs: String::new(),
            games: "Valorant, CS2".to_string(),
        }
    }

    #[test]
    fn test_insert_user_assigns_id_and_rejects_duplicate_email() {
        let store = MemoryStore::new();

        let id = block_on(store.insert_user(user("a@b.com"))).unwrap();
        let found = block_on(store.find_user(id)).unwrap().unwrap();
        assert_eq!(found.email, "a@b.com");

        let again = block_on(store.insert_user(user("a@b.com")));
        assert!(matches!(again, Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_list_venues_filters_by_area_in_insertion_order() {
        let store = MemoryStore::new();
        assert!(!block_on(store.has_venues()).unwrap());

        block_on(store.insert_venue(venue("Neon Nexus", "Bandra"))).unwrap();
        block_on(store.insert_venue(venue("Cyber Hive", "Powai"))).unwrap();
        block_on(store.insert_venue(venue("Glitch Gaming", "Bandra"))).unwrap();

        assert!(block_on(store.has_venues()).unwrap());

        let all = block_on(store.list_venues(None)).unwrap();
        let names: Vec<_> = all.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Neon Nexus", "Cyber Hive", "Glitch Gaming"]);

        let bandra = block_on(store.list_venues(Some("Bandra"))).unwrap();
        assert_eq!(bandra.len(), 2);
        assert!(bandra.iter().all(|v| v.area == "Bandra"));
    }

    #[test]
    fn test_reviews_are_scoped_to_venue() {
        let store = MemoryStore::new();
        let venue_id = block_on(store.insert_venue(venue("Neon Nexus", "Juhu"))).unwrap();
        let other_id = ObjectId::new();

        for target in [venue_id, other_id] {
            block_on(store.insert_review(Review {
                id: None,
                venue_id: target,
                user_id: ObjectId::new(),
                rating: 5,
                comment: "gg".to_string(),
                user_name: "NetRunner".to_string(),
            }))
            .unwrap();
        }

        let reviews = block_on(store.reviews_for_venue(venue_id)).unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].venue_id, venue_id);
    }
}
