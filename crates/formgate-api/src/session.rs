//! In-memory session store.
//!
//! Sessions tie the anti-forgery token and the per-client rate-limit windows
//! to a browser via an opaque cookie. State lives in process memory; a
//! restart resets sessions, which for a marketing-site form backend costs a
//! visitor one page refresh.

use crate::security::rate_limit::RateLimitWindow;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "fg_session";

/// Per-session state mutated by the gate's security stages.
#[derive(Debug, Default)]
pub struct SessionData {
    pub csrf_token: Option<String>,
    pub rate_windows: HashMap<String, RateLimitWindow>,
    last_seen: Option<Instant>,
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<String, SessionData>>>,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        SessionStore {
            inner: Arc::new(Mutex::new(HashMap::new())),
            idle_ttl,
        }
    }

    /// Run `f` against the session's data, creating the session on first
    /// touch. The store lock is held only for the duration of `f`.
    pub async fn with_session<F, R>(&self, session_id: &str, f: F) -> R
    where
        F: FnOnce(&mut SessionData) -> R,
    {
        let mut sessions = self.inner.lock().await;
        let data = sessions.entry(session_id.to_string()).or_default();
        data.last_seen = Some(Instant::now());
        f(data)
    }

    /// Drop sessions idle longer than the TTL. Called periodically from a
    /// background task.
    pub async fn sweep_expired(&self) {
        let mut sessions = self.inner.lock().await;
        let before = sessions.len();
        let ttl = self.idle_ttl;
        sessions.retain(|_, data| match data.last_seen {
            Some(seen) => seen.elapsed() < ttl,
            None => false,
        });
        let removed = before - sessions.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = sessions.len(), "Swept idle sessions");
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Periodic sweep loop; spawned once at startup.
    pub async fn run_sweeper(self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            self.sweep_expired().await;
        }
    }
}

/// Read the session cookie, minting a new session id (and cookie) when the
/// browser did not send one. The returned jar must be included in the
/// response for the cookie to stick.
pub fn ensure_session(jar: CookieJar) -> (String, CookieJar) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let value = cookie.value();
        if !value.is_empty() {
            return (value.to_string(), jar);
        }
    }

    let session_id = Uuid::new_v4().to_string();
    let cookie = Cookie::build((SESSION_COOKIE, session_id.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    (session_id, jar.add(cookie))
}
