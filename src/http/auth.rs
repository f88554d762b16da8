//! Session gate in front of the library routes.
//!
//! How sessions get issued (sign-in, passwords, users) lives elsewhere; this
//! module only answers "does this request carry a valid, unexpired session"
//! and turns every "no" into a redirect before any handler runs.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "id";
/// Where unauthenticated requests are sent.
pub const SIGN_IN_PATH: &str = "/sign-in";

#[async_trait]
pub trait SessionValidator: Send + Sync {
    async fn is_valid(&self, token: &str) -> bool;
}

struct SessionEntry {
    /// `None` for operator-provisioned sessions, which never expire.
    expires_at: Option<Instant>,
}

/// In-memory session table. Sessions last `ttl` from issuance.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, SessionEntry>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Start a new session and return its token.
    pub async fn issue(&self) -> String {
        let token = Uuid::new_v4().to_string();
        let entry = SessionEntry {
            expires_at: Some(Instant::now() + self.ttl),
        };
        self.sessions.lock().await.insert(token.clone(), entry);
        token
    }

    /// Register a fixed token that stays valid for the process lifetime.
    pub async fn provision(&self, token: impl Into<String>) {
        self.sessions
            .lock()
            .await
            .insert(token.into(), SessionEntry { expires_at: None });
    }

    pub async fn revoke(&self, token: &str) {
        self.sessions.lock().await.remove(token);
    }
}

#[async_trait]
impl SessionValidator for SessionStore {
    async fn is_valid(&self, token: &str) -> bool {
        let mut sessions = self.sessions.lock().await;
        let now = Instant::now();
        match sessions.get(token) {
            Some(SessionEntry { expires_at: None }) => true,
            Some(SessionEntry {
                expires_at: Some(expires_at),
            }) if *expires_at > now => true,
            _ => {
                sessions.remove(token);
                false
            }
        }
    }
}

/// Middleware letting through only requests whose `id` cookie names a valid
/// session. Everything else gets a 302 to the sign-in page.
pub async fn require_session(
    State(sessions): State<Arc<dyn SessionValidator>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if sessions.is_valid(cookie.value()).await {
            return next.run(request).await;
        }
    }

    tracing::debug!("Unauthenticated request to {}", request.uri().path());
    (StatusCode::FOUND, [(header::LOCATION, SIGN_IN_PATH)]).into_response()
}
