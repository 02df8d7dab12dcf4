//! Per-session submission rate limiting.
//!
//! Each (form, client) pair gets a fixed window keyed inside the session:
//! the first attempt opens the window, later attempts increment the count,
//! and once the count reaches the maximum further attempts are rejected
//! without incrementing. A window older than the configured duration resets
//! on the next attempt. The client IP is hashed before it becomes part of
//! the key so raw addresses never sit in session state.

use crate::session::SessionData;
use formgate_core::FormKind;
use sha2::{Digest, Sha256};
use std::time::{Duration, Instant};

/// One fixed rate-limit window.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitWindow {
    pub count: u32,
    pub start: Instant,
}

#[derive(Clone)]
pub struct RateLimiter {
    enabled: bool,
    max_attempts: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(enabled: bool, max_attempts: u32, window: Duration) -> Self {
        RateLimiter {
            enabled,
            max_attempts,
            window,
        }
    }

    /// Record an attempt and report whether it is allowed.
    pub fn check(&self, session: &mut SessionData, form: FormKind, client_ip: &str) -> bool {
        self.check_at(session, form, client_ip, Instant::now())
    }

    fn check_at(
        &self,
        session: &mut SessionData,
        form: FormKind,
        client_ip: &str,
        now: Instant,
    ) -> bool {
        if !self.enabled {
            return true;
        }

        let key = window_key(form, client_ip);
        match session.rate_windows.get_mut(&key) {
            None => {
                session
                    .rate_windows
                    .insert(key, RateLimitWindow { count: 1, start: now });
                true
            }
            Some(window) => {
                if now.duration_since(window.start) > self.window {
                    window.count = 1;
                    window.start = now;
                    return true;
                }
                if window.count >= self.max_attempts {
                    tracing::warn!(form = %form, attempts = window.count, "Rate limit exceeded");
                    return false;
                }
                window.count += 1;
                true
            }
        }
    }
}

/// Session-state key for a (form, client) pair.
fn window_key(form: FormKind, client_ip: &str) -> String {
    format!("{}:{}", form.as_str(), client_identity(client_ip))
}

/// Hash of the client IP used in rate-limit keys and structured logs.
pub fn client_identity(client_ip: &str) -> String {
    hex::encode(Sha256::digest(client_ip.as_bytes()))
}
