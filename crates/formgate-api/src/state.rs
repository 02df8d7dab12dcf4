//! Application state.

use crate::security::{CsrfGuard, RateLimiter};
use crate::services::template::Branding;
use crate::services::{CaptchaService, LogMailer, Mailer, SmtpMailer};
use crate::session::SessionStore;
use formgate_core::Config;
use formgate_storage::{LocalStorage, Storage};
use std::sync::Arc;
use std::time::Duration;

/// Shared state handed to every handler. All services are constructed once
/// at startup; tests build this directly with recording doubles in place of
/// the SMTP and filesystem backends.
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    pub csrf: CsrfGuard,
    pub rate_limiter: RateLimiter,
    pub captcha: CaptchaService,
    pub mailer: Arc<dyn Mailer>,
    pub storage: Arc<dyn Storage>,
    pub branding: Branding,
}

impl AppState {
    pub async fn from_config(config: Config) -> anyhow::Result<Arc<Self>> {
        let sessions = SessionStore::new(Duration::from_secs(config.session_idle_ttl_seconds));
        let csrf = CsrfGuard::new(config.csrf_enabled);
        let rate_limiter = RateLimiter::new(
            config.rate_limit_enabled,
            config.rate_limit_max_attempts,
            Duration::from_secs(config.rate_limit_window_seconds),
        );
        let captcha = CaptchaService::from_config(&config)?;

        let mailer: Arc<dyn Mailer> = if config.smtp_enabled {
            Arc::new(SmtpMailer::from_config(&config)?)
        } else {
            tracing::warn!("SMTP disabled; outbound email will be logged, not sent");
            Arc::new(LogMailer)
        };

        let storage: Arc<dyn Storage> = Arc::new(LocalStorage::new(&config.upload_dir).await?);

        let branding = Branding {
            company_name: config.company_name.clone(),
            logo_url: config.company_logo_url.clone(),
            site_url: config.site_url.clone(),
        };

        Ok(Arc::new(AppState {
            config,
            sessions,
            csrf,
            rate_limiter,
            captcha,
            mailer,
            storage,
            branding,
        }))
    }
}
