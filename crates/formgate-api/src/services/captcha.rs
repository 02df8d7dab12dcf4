//! CAPTCHA verification service.
//!
//! Thin wrapper that makes the verifier optional: when CAPTCHA is disabled in
//! config there is no backend and every submission passes the stage without a
//! network call.

use formgate_captcha::{ChallengeStatus, RecaptchaVerifier};
use formgate_core::Config;
use std::sync::Arc;

#[derive(Clone)]
pub struct CaptchaService {
    backend: Option<Arc<RecaptchaVerifier>>,
}

impl CaptchaService {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let backend = if config.recaptcha_enabled {
            let verifier = RecaptchaVerifier::new(
                config.recaptcha_verify_url.clone(),
                config.recaptcha_secret_key.clone(),
                config.recaptcha_min_score,
            )?;
            Some(Arc::new(verifier))
        } else {
            None
        };
        Ok(CaptchaService { backend })
    }

    pub fn disabled() -> Self {
        CaptchaService { backend: None }
    }

    pub fn enabled(&self) -> bool {
        self.backend.is_some()
    }

    pub async fn verify(&self, token: &str, expected_action: &str) -> ChallengeStatus {
        match &self.backend {
            Some(verifier) => verifier.verify(token, Some(expected_action)).await,
            None => ChallengeStatus::Verified,
        }
    }
}
