//! # API de Reservas
//!
//! - Crear una reserva con puesto asignado al azar
//! - Listar las reservas del usuario autenticado
//!
//! Toda reserva queda en estado `Confirmed`. No se comprueba si el puesto ya
//! está ocupado en esa franja ni se valida el precio enviado por el cliente.

use actix_web::{get, post, web, HttpResponse, Responder};
use mongodb::bson::oid::ObjectId;
use rand::Rng;
use serde::{Deserialize, Serialize};
use super::{AppError, AppResult, AppState, SessionContext};
use crate::db::models::{hex_id, BOOKING_CONFIRMED};
use crate::db::Booking;

/// Número de puestos por local
const SEATS_PER_VENUE: u32 = 20;

#[derive(Deserialize)]
struct MakeBooking {
    cafe_id: String,
    /// Fecha tal como la envía el cliente
    date: String,
    time_slot: String,
    /// Horas
    duration: f64,
    total_price: f64,
}

#[derive(Serialize)]
struct BookingCreated {
    message: &'static str,
    booking_id: String,
    seat: String,
}

/// Reserva tal como la ve su propietario
#[derive(Serialize)]
struct BookingResponse {
    id: String,
    cafe_name: String,
    date: String,
    time: String,
    duration: f64,
    price: f64,
    seat: String,
    status: String,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        BookingResponse {
            id: hex_id(booking.id),
            cafe_name: booking.venue_name,
            date: booking.date,
            time: booking.time_slot,
            duration: booking.duration_hours,
            price: booking.total_price,
            seat: booking.seat_number,
            status: booking.status,
        }
    }
}

/// Etiqueta de puesto, p.ej. `PC-07`
pub fn seat_label(seat: u32) -> String {
    format!("PC-{:02}", seat)
}

fn random_seat() -> String {
    seat_label(rand::thread_rng().gen_range(1..=SEATS_PER_VENUE))
}

/// Crea una reserva confirmada para el usuario de la sesión
///
/// # Respuesta
/// ```json
/// {
///   "message": "Booking Confirmed",
///   "booking_id": "65f1c0...",
///   "seat": "PC-07"
/// }
/// ```
///
/// # Errores
/// - `400 Bad Request`: Cuerpo mal formado o `cafe_id` inválido
/// - `401 Unauthorized`: Sin sesión
#[post("/api/book")]
async fn create_booking(
    state: web::Data<AppState>,
    session: SessionContext,
    data: web::Json<MakeBooking>,
) -> AppResult<impl Responder> {
    let store = state.store()?;
    let user_id = session.require_user()?;
    let data = data.into_inner();

    let venue_id = ObjectId::parse_str(&data.cafe_id)
        .map_err(|_| AppError::Validation("Invalid cafe_id".to_string()))?;

    let venue_name = store
        .find_venue(venue_id)
        .await?
        .map(|venue| venue.name)
        .unwrap_or_else(|| "Unknown Cafe".to_string());

    let seat = random_seat();
    let booking = Booking {
        id: None,
        user_id,
        venue_id,
        venue_name,
        date: data.date,
        time_slot: data.time_slot,
        duration_hours: data.duration,
        total_price: data.total_price,
        seat_number: seat.clone(),
        status: BOOKING_CONFIRMED.to_string(),
    };

    let booking_id = store.insert_booking(booking).await?;
    tracing::info!(
        user_id = %user_id,
        booking_id = %booking_id,
        seat = %seat,
        "Booking confirmed"
    );

    Ok(HttpResponse::Ok().json(BookingCreated {
        message: "Booking Confirmed",
        booking_id: booking_id.to_hex(),
        seat,
    }))
}

/// Reservas del usuario autenticado, en orden de almacenamiento
#[get("/api/user/bookings")]
async fn list_my_bookings(
    state: web::Data<AppState>,
    session: SessionContext,
) -> AppResult<impl Responder> {
    let store = state.store()?;
    let user_id = session.require_user()?;

    let bookings: Vec<BookingResponse> = store
        .bookings_for_user(user_id)
        .await?
        .into_iter()
        .map(BookingResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(bookings))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_booking);
    cfg.service(list_my_bookings);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::{TestRequest, call_and_read_body_json, call_service};
    use serde_json::json;
    use crate::api::test_support::{memory_state, session_cookie, test_app, venue};
    use crate::db::seed::{demo_user, DEMO_EMAIL};
    use crate::db::Store;

    fn is_seat_label(seat: &str) -> bool {
        match seat.strip_prefix("PC-") {
            Some(n) => n.len() == 2 && n.chars().all(|c| c.is_ascii_digit()),
            None => false,
        }
    }

    #[test]
    fn test_seat_label_is_zero_padded() {
        assert_eq!(seat_label(7), "PC-07");
        assert_eq!(seat_label(20), "PC-20");
    }

    #[test]
    fn test_random_seat_stays_in_range() {
        for _ in 0..200 {
            let seat = random_seat();
            assert!(is_seat_label(&seat), "{}", seat);
            let n: u32 = seat[3..].parse().unwrap();
            assert!((1..=SEATS_PER_VENUE).contains(&n));
        }
    }

    #[actix_web::test]
    async fn test_booking_without_session_writes_nothing() {
        let (state, store) = memory_state();
        let venue_id = store.insert_venue(venue("Neon Nexus", "Powai", 200)).await.unwrap();
        let app = test_app!(state);

        let req = TestRequest::post()
            .uri("/api/book")
            .set_json(json!({
                "cafe_id": venue_id.to_hex(),
                "date": "2026-10-20",
                "time_slot": "18:00",
                "duration": 2,
                "total_price": 400
            }))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = TestRequest::get().uri("/api/user/bookings").to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_booking_is_listed_for_its_owner() {
        let (state, store) = memory_state();
        let venue_id = store.insert_venue(venue("Neon Nexus", "Powai", 200)).await.unwrap();
        store.insert_user(demo_user()).await.unwrap();
        let app = test_app!(state);

        let req = TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": DEMO_EMAIL, "password": "password"}))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = session_cookie(&resp);

        let req = TestRequest::post()
            .uri("/api/book")
            .cookie(cookie.clone())
            .set_json(json!({
                "cafe_id": venue_id.to_hex(),
                "date": "2026-10-20",
                "time_slot": "18:00",
                "duration": 1.5,
                "total_price": 300
            }))
            .to_request();
        let created: serde_json::Value = call_and_read_body_json(&app, req).await;
        assert_eq!(created["message"], "Booking Confirmed");
        assert!(is_seat_label(created["seat"].as_str().unwrap()));

        let req = TestRequest::get()
            .uri("/api/user/bookings")
            .cookie(cookie)
            .to_request();
        let listed: serde_json::Value = call_and_read_body_json(&app, req).await;
        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["id"], created["booking_id"]);
        assert_eq!(listed[0]["seat"], created["seat"]);
        assert_eq!(listed[0]["cafe_name"], "Neon Nexus");
        assert_eq!(listed[0]["time"], "18:00");
        assert_eq!(listed[0]["duration"], 1.5);
        assert_eq!(listed[0]["price"], 300.0);
        assert_eq!(listed[0]["status"], "Confirmed");
    }

    #[actix_web::test]
    async fn test_bookings_are_private_and_unknown_cafe_is_named() {
        let (state, _) = memory_state();
        let app = test_app!(state);

        let mut cookies = Vec::new();
        for email in ["one@cyber.com", "two@cyber.com"] {
            let req = TestRequest::post()
                .uri("/api/auth/signup")
                .set_json(json!({"username": email, "email": email, "password": "p"}))
                .to_request();
            let resp = call_service(&app, req).await;
            cookies.push(session_cookie(&resp));
        }

        let req = TestRequest::post()
            .uri("/api/book")
            .cookie(cookies[0].clone())
            .set_json(json!({
                "cafe_id": ObjectId::new().to_hex(),
                "date": "2026-10-21",
                "time_slot": "20:00",
                "duration": 1,
                "total_price": 150
            }))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = TestRequest::get()
            .uri("/api/user/bookings")
            .cookie(cookies[0].clone())
            .to_request();
        let mine: serde_json::Value = call_and_read_body_json(&app, req).await;
        assert_eq!(mine[0]["cafe_name"], "Unknown Cafe");

        let req = TestRequest::get()
            .uri("/api/user/bookings")
            .cookie(cookies[1].clone())
            .to_request();
        let theirs: serde_json::Value = call_and_read_body_json(&app, req).await;
        assert!(theirs.as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_booking_rejects_malformed_body() {
        let (state, _) = memory_state();
        let app = test_app!(state);

        let req = TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(json!({"username": "b", "email": "b@cyber.com", "password": "p"}))
            .to_request();
        let resp = call_service(&app, req).await;
        let cookie = session_cookie(&resp);

        let req = TestRequest::post()
            .uri("/api/book")
            .cookie(cookie)
            .set_json(json!({"cafe_id": ObjectId::new().to_hex(), "date": "2026-10-21"}))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
