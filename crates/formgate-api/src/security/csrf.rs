//! Anti-forgery token issue and verification.
//!
//! One token per session, issued on demand and stable until the session
//! expires. Verification compares in constant time; a missing session token,
//! a missing submitted token, or any mismatch all fail the same way.

use crate::session::SessionData;
use rand::RngCore;
use subtle::ConstantTimeEq;

const TOKEN_BYTES: usize = 32;

#[derive(Clone)]
pub struct CsrfGuard {
    enabled: bool,
}

impl CsrfGuard {
    pub fn new(enabled: bool) -> Self {
        CsrfGuard { enabled }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Return the session's token, minting one on first call. Idempotent:
    /// repeated calls within one session return the same token.
    pub fn issue(&self, session: &mut SessionData) -> String {
        session
            .csrf_token
            .get_or_insert_with(generate_token)
            .clone()
    }

    /// Check a submitted token against the session's token.
    pub fn verify(&self, session: &SessionData, supplied: &str) -> bool {
        if !self.enabled {
            return true;
        }
        let Some(expected) = session.csrf_token.as_deref() else {
            return false;
        };
        if supplied.is_empty() {
            return false;
        }
        expected.as_bytes().ct_eq(supplied.as_bytes()).into()
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_is_idempotent_within_a_session() {
        let guard = CsrfGuard::new(true);
        let mut session = SessionData::default();

        let first = guard.issue(&mut session);
        let second = guard.issue(&mut session);
        assert_eq!(first, second);
        assert_eq!(first.len(), TOKEN_BYTES * 2);
    }

    #[test]
    fn tokens_differ_across_sessions() {
        let guard = CsrfGuard::new(true);
        let a = guard.issue(&mut SessionData::default());
        let b = guard.issue(&mut SessionData::default());
        assert_ne!(a, b);
    }

    #[test]
    fn verify_accepts_the_issued_token_only() {
        let guard = CsrfGuard::new(true);
        let mut session = SessionData::default();
        let token = guard.issue(&mut session);

        assert!(guard.verify(&session, &token));
        assert!(!guard.verify(&session, "deadbeef"));
        assert!(!guard.verify(&session, ""));
    }

    #[test]
    fn verify_fails_without_an_issued_token() {
        let guard = CsrfGuard::new(true);
        let session = SessionData::default();
        assert!(!guard.verify(&session, "anything"));
    }

    #[test]
    fn disabled_guard_accepts_everything() {
        let guard = CsrfGuard::new(false);
        let session = SessionData::default();
        assert!(guard.verify(&session, ""));
        assert!(guard.verify(&session, "whatever"));
    }
}
