//! # Sesiones
//!
//! El servidor guarda un mapa `token -> usuario` y el cliente solo conoce el
//! token opaco, enviado en la cookie [`SESSION_COOKIE`]. Cada request recibe
//! un [`SessionContext`] con el usuario autenticado, si lo hay.

use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use tokio::sync::RwLock;
use uuid::Uuid;
use super::{AppError, AppResult, AppState};

pub const SESSION_COOKIE: &str = "cyberverse_session";

#[derive(Debug, Clone)]
struct SessionEntry {
    user_id: ObjectId,
    expires_at: i64,
}

impl SessionEntry {
    fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}

/// Almacén de sesiones en memoria del proceso
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
    ttl_seconds: i64,
}

impl SessionStore {
    /// Una duración negativa se trata como cero
    pub fn new(ttl_hours: i64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl_seconds: ttl_hours.max(0).saturating_mul(3600),
        }
    }

    /// Abre una sesión para el usuario y devuelve su token
    pub async fn create(&self, user_id: ObjectId) -> String {
        let now = current_timestamp();
        let token = Uuid::new_v4().to_string();

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, entry| !entry.is_expired(now));
        sessions.insert(
            token.clone(),
            SessionEntry {
                user_id,
                expires_at: now.saturating_add(self.ttl_seconds),
            },
        );
        token
    }

    /// Usuario asociado al token, `None` si no existe o ha caducado
    pub async fn user_for(&self, token: &str) -> Option<ObjectId> {
        let now = current_timestamp();
        self.sessions
            .read()
            .await
            .get(token)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.user_id)
    }

    pub async fn remove(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }
}

/// Contexto de sesión de una request
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub token: Option<String>,
    pub user_id: Option<ObjectId>,
}

impl SessionContext {
    /// Usuario autenticado o `Unauthorized`
    pub fn require_user(&self) -> AppResult<ObjectId> {
        self.user_id.ok_or_else(AppError::unauthorized)
    }
}

impl FromRequest for SessionContext {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());

        Box::pin(async move {
            let state = state
                .ok_or_else(|| AppError::Internal("Application state not configured".to_string()))?;

            let user_id = match &token {
                Some(token) => state.sessions.user_for(token).await,
                None => None,
            };

            Ok(SessionContext { token, user_id })
        })
    }
}

/// Cookie que entrega el token al cliente
pub fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

/// Cookie caducada que borra la sesión en el cliente
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = session_cookie("");
    cookie.make_removal();
    cookie
}

fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_roundtrip() {
        let store = SessionStore::new(24);
        let user_id = ObjectId::new();

        let token = store.create(user_id).await;
        assert_eq!(store.user_for(&token).await, Some(user_id));

        store.remove(&token).await;
        assert_eq!(store.user_for(&token).await, None);
    }

    #[tokio::test]
    async fn test_expired_session_is_ignored() {
        let store = SessionStore::new(0);
        let token = store.create(ObjectId::new()).await;
        assert_eq!(store.user_for(&token).await, None);
    }

    #[tokio::test]
    async fn test_huge_ttl_saturates() {
        let store = SessionStore::new(i64::MAX);
        let user_id = ObjectId::new();
        let token = store.create(user_id).await;
        assert_eq!(store.user_for(&token).await, Some(user_id));

        let store = SessionStore::new(-5);
        let token = store.create(user_id).await;
        assert_eq!(store.user_for(&token).await, None);
    }

    #[tokio::test]
    async fn test_tokens_are_unique_per_login() {
        let store = SessionStore::new(24);
        let user_id = ObjectId::new();
        let first = store.create(user_id).await;
        let second = store.create(user_id).await;
        assert_ne!(first, second);
        assert_eq!(store.user_for(&first).await, Some(user_id));
    }

    #[test]
    fn test_require_user_without_session() {
        let ctx = SessionContext::default();
        assert!(matches!(ctx.require_user(), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc");
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }
}
