//! # API de Autenticación
//!
//! - Registro de usuarios
//! - Login por email y contraseña
//! - Logout
//!
//! Signup y login abren una sesión de servidor y devuelven su token en la
//! cookie de sesión. La contraseña se guarda y compara en texto plano.

use actix_web::{post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use super::session::{removal_cookie, session_cookie};
use super::{AppError, AppResult, AppState, MessageResponse, SessionContext};
use crate::db::User;

#[derive(Deserialize)]
struct SignupRequest {
    username: String,
    email: String,
    password: String,
    #[serde(default)]
    phone: String,
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct UserSummary {
    username: String,
    id: String,
}

#[derive(Serialize)]
struct AuthResponse {
    message: &'static str,
    user: UserSummary,
}

fn require_field(name: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("Field '{}' is required", name)));
    }
    Ok(())
}

/// Registra un usuario nuevo y abre su sesión
///
/// # Respuesta
///
/// ```json
/// {
///   "message": "Signup Successful",
///   "user": { "username": "NetRunner", "id": "65f1c0..." }
/// }
/// ```
///
/// # Errores
///
/// - `400 Bad Request`: Campos vacíos o email ya registrado
/// - `503 Service Unavailable`: Sin base de datos
#[post("/api/auth/signup")]
async fn signup(
    state: web::Data<AppState>,
    data: web::Json<SignupRequest>,
) -> AppResult<impl Responder> {
    let store = state.store()?;
    let data = data.into_inner();

    require_field("username", &data.username)?;
    require_field("email", &data.email)?;
    require_field("password", &data.password)?;

    // Comprobación previa; el backend puede volver a detectar el duplicado
    if store.find_user_by_email(&data.email).await?.is_some() {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    let user = User {
        id: None,
        username: data.username,
        email: data.email,
        password: data.password,
        phone: data.phone,
    };
    let username = user.username.clone();
    let user_id = store.insert_user(user).await?;

    let token = state.sessions.create(user_id).await;
    tracing::info!(user_id = %user_id, "User signed up");

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&token))
        .json(AuthResponse {
            message: "Signup Successful",
            user: UserSummary {
                username,
                id: user_id.to_hex(),
            },
        }))
}

/// Valida email y contraseña y abre una sesión
///
/// # Errores
///
/// - `401 Unauthorized`: Email desconocido o contraseña distinta
#[post("/api/auth/login")]
async fn login(
    state: web::Data<AppState>,
    data: web::Json<LoginRequest>,
) -> AppResult<impl Responder> {
    let store = state.store()?;

    let user = match store.find_user_by_email(&data.email).await? {
        Some(user) if user.password == data.password => user,
        _ => {
            tracing::warn!(email = %data.email, "Failed login");
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }
    };

    let user_id = user
        .id
        .ok_or_else(|| AppError::Internal("Stored user has no id".to_string()))?;
    let username = user.username;
    let token = state.sessions.create(user_id).await;
    tracing::info!(user_id = %user_id, "User logged in");

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&token))
        .json(AuthResponse {
            message: "Login Successful",
            user: UserSummary {
                username,
                id: user_id.to_hex(),
            },
        }))
}

#[post("/api/auth/logout")]
async fn logout(state: web::Data<AppState>, session: SessionContext) -> impl Responder {
    if let Some(token) = &session.token {
        state.sessions.remove(token).await;
    }

    HttpResponse::Ok()
        .cookie(removal_cookie())
        .json(MessageResponse { message: "Logged out" })
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(signup);
    cfg.service(login);
    cfg.service(logout);
}
