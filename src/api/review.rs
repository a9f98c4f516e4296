//! # API de Reseñas
//!
//! Publicación de reseñas firmadas con el nombre del usuario de la sesión.

use actix_web::{post, web, HttpResponse, Responder};
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use super::{AppError, AppResult, AppState, MessageResponse, SessionContext};
use crate::db::Review;

#[derive(Deserialize)]
struct NewReview {
    cafe_id: String,
    rating: i32,
    comment: String,
}

/// Publica una reseña del usuario autenticado.
///
/// No comprueba que el local exista ni el rango de la puntuación.
#[post("/api/reviews")]
async fn add_review(
    state: web::Data<AppState>,
    session: SessionContext,
    data: web::Json<NewReview>,
) -> AppResult<impl Responder> {
    let store = state.store()?;
    let user_id = session.require_user()?;
    let data = data.into_inner();

    let venue_id = ObjectId::parse_str(&data.cafe_id)
        .map_err(|_| AppError::Validation("Invalid cafe_id".to_string()))?;

    let user_name = store
        .find_user(user_id)
        .await?
        .map(|user| user.username)
        .unwrap_or_else(|| "Unknown".to_string());

    store
        .insert_review(Review {
            id: None,
            venue_id,
            user_id,
            rating: data.rating,
            comment: data.comment,
            user_name,
        })
        .await?;

    tracing::info!(user_id = %user_id, cafe_id = %venue_id, "Review posted");
    Ok(HttpResponse::Ok().json(MessageResponse { message: "Review posted" }))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(add_review);
}
