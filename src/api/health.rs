//! Raíz del API y comprobación de salud.

use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;
use super::AppState;

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "online",
        "message": "CYBERVERSE API is running",
        "endpoints": [
            "/api/auth/login",
            "/api/auth/signup",
            "/api/cafes",
            "/api/cafe/<id>",
            "/api/book"
        ]
    }))
}

/// Estado del servicio. Siempre responde 200; `database` indica si el
/// almacenamiento está configurado y contesta al ping.
#[get("/api/health")]
async fn health(state: web::Data<AppState>) -> impl Responder {
    let connected = match state.store() {
        Ok(store) => match store.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(backend = store.backend(), error = %e, "Health check ping failed");
                false
            }
        },
        Err(_) => false,
    };

    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "database": if connected { "connected" } else { "disconnected" }
    }))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index);
    cfg.service(health);
}
