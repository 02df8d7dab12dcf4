//! CAPTCHA verification client.
//!
//! One synchronous-within-the-request call to a third-party scoring service
//! (reCAPTCHA v3 shape: `{success, score?, action?}`). The verifier fails
//! closed: an empty token, a transport error, an unparseable body, a missing
//! or false success flag, a score below the configured minimum, or an action
//! mismatch all reject the submission. Nothing here panics or propagates a
//! transport error to the caller.

use formgate_core::CaptchaVerdict;
use serde::Serialize;
use std::time::Duration;

/// Outbound verification requests are bounded so a slow scoring service
/// cannot hang the request indefinitely.
const VERIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Status of a CAPTCHA challenge verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeStatus {
    /// Token sent and verified.
    Verified,
    /// Verification rejected; carries the client-facing reason.
    Failed(String),
}

impl ChallengeStatus {
    pub fn is_verified(&self) -> bool {
        matches!(self, ChallengeStatus::Verified)
    }
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    secret: &'a str,
    response: &'a str,
}

/// Client for the third-party verification endpoint.
#[derive(Clone)]
pub struct RecaptchaVerifier {
    verify_url: String,
    secret_key: String,
    min_score: f64,
    client: reqwest::Client,
}

impl RecaptchaVerifier {
    pub fn new(
        verify_url: impl Into<String>,
        secret_key: impl Into<String>,
        min_score: f64,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(VERIFY_TIMEOUT).build()?;
        Ok(Self {
            verify_url: verify_url.into(),
            secret_key: secret_key.into(),
            min_score,
            client,
        })
    }

    /// Verify the token submitted with a form.
    ///
    /// `expected_action` is the per-form action name the page requested the
    /// token for; a verdict naming a different action is rejected.
    pub async fn verify(&self, token: &str, expected_action: Option<&str>) -> ChallengeStatus {
        if token.is_empty() {
            return ChallengeStatus::Failed("reCAPTCHA verification failed.".to_string());
        }

        let body = VerifyRequest {
            secret: &self.secret_key,
            response: token,
        };

        let response = match self.client.post(&self.verify_url).form(&body).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, "CAPTCHA verification request failed, rejecting");
                return ChallengeStatus::Failed("reCAPTCHA verification failed.".to_string());
            }
        };

        let verdict: CaptchaVerdict = match response.json().await {
            Ok(verdict) => verdict,
            Err(err) => {
                tracing::warn!(error = %err, "CAPTCHA verdict unparseable, rejecting");
                return ChallengeStatus::Failed("reCAPTCHA verification failed.".to_string());
            }
        };

        evaluate_verdict(&verdict, self.min_score, expected_action)
    }
}

/// Decide a verdict against the configured thresholds.
///
/// Separated from the network call so the decision rules are testable
/// without a server.
pub fn evaluate_verdict(
    verdict: &CaptchaVerdict,
    min_score: f64,
    expected_action: Option<&str>,
) -> ChallengeStatus {
    if !verdict.success {
        return ChallengeStatus::Failed("reCAPTCHA verification failed.".to_string());
    }

    if let Some(score) = verdict.score {
        if score < min_score {
            tracing::debug!(score, min_score, "CAPTCHA score below threshold");
            return ChallengeStatus::Failed(
                "Suspicious activity detected. Please try again.".to_string(),
            );
        }
    }

    if let (Some(expected), Some(action)) = (expected_action, verdict.action.as_deref()) {
        if !expected.is_empty() && action != expected {
            tracing::debug!(expected, action, "CAPTCHA action mismatch");
            return ChallengeStatus::Failed("reCAPTCHA action mismatch.".to_string());
        }
    }

    ChallengeStatus::Verified
}
