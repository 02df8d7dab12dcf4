//! Shared test harness: a full router over recording doubles.

use async_trait::async_trait;
use axum_test::TestServer;
use formgate_api::security::{CsrfGuard, RateLimiter};
use formgate_api::services::mailer::{MailError, Mailer, OutgoingEmail};
use formgate_api::services::template::Branding;
use formgate_api::services::CaptchaService;
use formgate_api::session::SessionStore;
use formgate_api::setup::routes::build_router;
use formgate_api::state::AppState;
use formgate_core::Config;
use formgate_storage::LocalStorage;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Mailer double that records every send and can be told to fail.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    fail: AtomicBool,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn fail_next_sends(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MailError::Transport("connection refused".to_string()));
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub mailer: Arc<RecordingMailer>,
    pub upload_dir: PathBuf,
    _tempdir: TempDir,
}

impl TestApp {
    /// Names of files currently sitting in the upload directory.
    pub fn stored_uploads(&self) -> Vec<String> {
        std::fs::read_dir(&self.upload_dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Fetch the session's anti-forgery token, establishing the session
    /// cookie as a side effect.
    pub async fn csrf_token(&self) -> String {
        let response = self.server.get("/api/forms/csrf-token").await;
        let body: serde_json::Value = response.json();
        body["data"]["csrf_token"].as_str().unwrap().to_string()
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

pub async fn spawn_app_with(tweak: impl FnOnce(&mut Config)) -> TestApp {
    let tempdir = tempfile::tempdir().unwrap();
    let upload_dir = tempdir.path().join("uploads");

    let mut config = test_config(&upload_dir);
    tweak(&mut config);

    let mailer = Arc::new(RecordingMailer::default());
    let storage = LocalStorage::new(&upload_dir).await.unwrap();

    let state = Arc::new(AppState {
        sessions: SessionStore::new(Duration::from_secs(config.session_idle_ttl_seconds)),
        csrf: CsrfGuard::new(config.csrf_enabled),
        rate_limiter: RateLimiter::new(
            config.rate_limit_enabled,
            config.rate_limit_max_attempts,
            Duration::from_secs(config.rate_limit_window_seconds),
        ),
        captcha: CaptchaService::disabled(),
        mailer: mailer.clone(),
        storage: Arc::new(storage),
        branding: Branding {
            company_name: config.company_name.clone(),
            logo_url: config.company_logo_url.clone(),
            site_url: config.site_url.clone(),
        },
        config,
    });

    let server = TestServer::builder()
        .save_cookies()
        .build(build_router(state))
        .unwrap();

    TestApp {
        server,
        mailer,
        upload_dir,
        _tempdir: tempdir,
    }
}

fn test_config(upload_dir: &std::path::Path) -> Config {
    Config {
        server_port: 0,
        cors_origins: vec![],
        environment: "test".to_string(),
        session_idle_ttl_seconds: 3600,
        csrf_enabled: true,
        recaptcha_enabled: false,
        recaptcha_site_key: String::new(),
        recaptcha_secret_key: String::new(),
        recaptcha_verify_url: String::new(),
        recaptcha_min_score: 0.5,
        rate_limit_enabled: true,
        rate_limit_max_attempts: 5,
        rate_limit_window_seconds: 3600,
        upload_enabled: true,
        upload_dir: upload_dir.to_string_lossy().into_owned(),
        upload_max_size_bytes: 5 * 1024 * 1024,
        upload_allowed_extensions: vec![
            "pdf".to_string(),
            "doc".to_string(),
            "docx".to_string(),
        ],
        smtp_enabled: false,
        smtp_host: String::new(),
        smtp_port: 587,
        smtp_username: String::new(),
        smtp_password: String::new(),
        smtp_starttls: true,
        email_from_address: "noreply@example.com".to_string(),
        email_from_name: "Acme Telecom".to_string(),
        email_contact_to: "contact@example.com".to_string(),
        email_careers_to: "careers@example.com".to_string(),
        email_partners_to: "partners@example.com".to_string(),
        email_newsletter_to: "newsletter@example.com".to_string(),
        site_url: "https://example.com".to_string(),
        company_name: "Acme Telecom".to_string(),
        company_logo_url: "https://cdn.example.com/logo.png".to_string(),
    }
}
