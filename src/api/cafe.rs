//! # API de Locales
//!
//! Lectura del catálogo: listado con filtros opcionales y detalle de un local
//! con sus reseñas. No requiere sesión.

use actix_web::{get, web, HttpResponse, Responder};
use mongodb::bson::oid::ObjectId;
use serde::{de, Deserialize, Deserializer, Serialize};
use super::{AppError, AppResult, AppState};
use crate::db::models::hex_id;
use crate::db::{Review, Venue};

/// Parámetros de consulta del listado
#[derive(Deserialize)]
struct VenueQuery {
    /// Área exacta; vacío o `All` no filtra
    area: Option<String>,
    /// Precio máximo por hora, inclusive; vacío no filtra
    #[serde(default, deserialize_with = "empty_as_none")]
    price_max: Option<i64>,
}

/// `price_max=` llega como cadena vacía desde formularios sin valor
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(de::Error::custom),
    }
}

#[derive(Serialize)]
struct VenueResponse {
    id: String,
    name: String,
    area: String,
    price_per_hour: i64,
    rating: f64,
    distance_km: f64,
    image_url: String,
    logo_url: String,
    travel_info: String,
    specs: String,
    games: String,
}

impl From<Venue> for VenueResponse {
    fn from(venue: Venue) -> Self {
        VenueResponse {
            id: hex_id(venue.id),
            name: venue.name,
            area: venue.area,
            price_per_hour: venue.price_per_hour,
            rating: venue.rating,
            distance_km: venue.distance_km,
            image_url: venue.image_url,
            logo_url: venue.logo_url,
            travel_info: venue.travel_info,
            specs: venue.specs,
            games: venue.games,
        }
    }
}

#[derive(Serialize)]
struct ReviewSummary {
    user: String,
    rating: i32,
    comment: String,
}

impl From<Review> for ReviewSummary {
    fn from(review: Review) -> Self {
        ReviewSummary {
            user: review.user_name,
            rating: review.rating,
            comment: review.comment,
        }
    }
}

#[derive(Serialize)]
struct VenueDetail {
    #[serde(flatten)]
    venue: VenueResponse,
    reviews: Vec<ReviewSummary>,
}

fn area_filter(area: Option<&str>) -> Option<&str> {
    area.filter(|a| !a.is_empty() && *a != "All")
}

fn within_budget(venue: &Venue, price_max: Option<i64>) -> bool {
    price_max.map_or(true, |max| venue.price_per_hour <= max)
}

/// Lista los locales
///
/// El área se filtra en el almacenamiento y el precio en memoria. El orden es
/// el de almacenamiento.
#[get("/api/cafes")]
async fn list_venues(
    state: web::Data<AppState>,
    query: web::Query<VenueQuery>,
) -> AppResult<impl Responder> {
    let store = state.store()?;

    let venues = store
        .list_venues(area_filter(query.area.as_deref()))
        .await?;

    let results: Vec<VenueResponse> = venues
        .into_iter()
        .filter(|venue| within_budget(venue, query.price_max))
        .map(VenueResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(results))
}

/// Detalle de un local con sus reseñas
///
/// # Errores
/// - `404 Not Found`: Id desconocido o mal formado
#[get("/api/cafe/{id}")]
async fn get_venue(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<impl Responder> {
    let store = state.store()?;

    let venue_id = ObjectId::parse_str(path.as_str()).map_err(|_| AppError::not_found())?;
    let venue = store
        .find_venue(venue_id)
        .await?
        .ok_or_else(AppError::not_found)?;

    let reviews = store.reviews_for_venue(venue_id).await?;

    Ok(HttpResponse::Ok().json(VenueDetail {
        venue: VenueResponse::from(venue),
        reviews: reviews.into_iter().map(ReviewSummary::from).collect(),
    }))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_venues);
    cfg.service(get_venue);
}
