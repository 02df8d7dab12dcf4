//! Configuration module
//!
//! Environment-driven configuration for the form processing service. All
//! toggles are read once at startup; `validate()` fails fast on combinations
//! that would only surface as runtime errors later (CAPTCHA enabled without a
//! secret, SMTP enabled without credentials, and so on).

use std::env;

// Defaults
const SERVER_PORT: u16 = 3000;
const RATE_LIMIT_MAX_ATTEMPTS: u32 = 5;
const RATE_LIMIT_WINDOW_SECONDS: u64 = 3600;
const RECAPTCHA_MIN_SCORE: f64 = 0.5;
const RECAPTCHA_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";
const UPLOAD_MAX_SIZE_MB: usize = 5;
const UPLOAD_DIR: &str = "uploads/resumes";
const SMTP_PORT: u16 = 587;
const SESSION_IDLE_TTL_SECONDS: u64 = 3600;

/// Runtime configuration, loaded once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    // Server
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub session_idle_ttl_seconds: u64,

    // Anti-forgery
    pub csrf_enabled: bool,

    // CAPTCHA (reCAPTCHA v3 style scoring service)
    pub recaptcha_enabled: bool,
    pub recaptcha_site_key: String,
    pub recaptcha_secret_key: String,
    pub recaptcha_verify_url: String,
    pub recaptcha_min_score: f64,

    // Rate limiting
    pub rate_limit_enabled: bool,
    pub rate_limit_max_attempts: u32,
    pub rate_limit_window_seconds: u64,

    // Attachment uploads (career form)
    pub upload_enabled: bool,
    pub upload_dir: String,
    pub upload_max_size_bytes: usize,
    pub upload_allowed_extensions: Vec<String>,

    // Mail relay
    pub smtp_enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub smtp_starttls: bool,

    // Sender identity
    pub email_from_address: String,
    pub email_from_name: String,

    // Per-form recipients
    pub email_contact_to: String,
    pub email_careers_to: String,
    pub email_partners_to: String,
    pub email_newsletter_to: String,

    // Site identity (used by the notification templates)
    pub site_url: String,
    pub company_name: String,
    pub company_logo_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let config = Config {
            server_port: env_parse("SERVER_PORT", SERVER_PORT)?,
            cors_origins: env_list("CORS_ORIGINS"),
            environment,
            session_idle_ttl_seconds: env_parse(
                "SESSION_IDLE_TTL_SECONDS",
                SESSION_IDLE_TTL_SECONDS,
            )?,

            csrf_enabled: env_bool("CSRF_ENABLED", true),

            recaptcha_enabled: env_bool("RECAPTCHA_ENABLED", false),
            recaptcha_site_key: env_or("RECAPTCHA_SITE_KEY", ""),
            recaptcha_secret_key: env_or("RECAPTCHA_SECRET_KEY", ""),
            recaptcha_verify_url: env_or("RECAPTCHA_VERIFY_URL", RECAPTCHA_VERIFY_URL),
            recaptcha_min_score: env_parse("RECAPTCHA_MIN_SCORE", RECAPTCHA_MIN_SCORE)?,

            rate_limit_enabled: env_bool("RATE_LIMIT_ENABLED", true),
            rate_limit_max_attempts: env_parse("RATE_LIMIT_MAX_ATTEMPTS", RATE_LIMIT_MAX_ATTEMPTS)?,
            rate_limit_window_seconds: env_parse(
                "RATE_LIMIT_WINDOW_SECONDS",
                RATE_LIMIT_WINDOW_SECONDS,
            )?,

            upload_enabled: env_bool("UPLOAD_ENABLED", true),
            upload_dir: env_or("UPLOAD_DIR", UPLOAD_DIR),
            upload_max_size_bytes: env_parse("UPLOAD_MAX_SIZE_MB", UPLOAD_MAX_SIZE_MB)?
                * 1024
                * 1024,
            upload_allowed_extensions: {
                let exts = env_list("UPLOAD_ALLOWED_EXTENSIONS");
                if exts.is_empty() {
                    vec!["pdf".to_string(), "doc".to_string(), "docx".to_string()]
                } else {
                    exts
                }
            },

            smtp_enabled: env_bool("SMTP_ENABLED", false),
            smtp_host: env_or("SMTP_HOST", ""),
            smtp_port: env_parse("SMTP_PORT", SMTP_PORT)?,
            smtp_username: env_or("SMTP_USERNAME", ""),
            smtp_password: env_or("SMTP_PASSWORD", ""),
            smtp_starttls: env_bool("SMTP_STARTTLS", true),

            email_from_address: env_or("EMAIL_FROM_ADDRESS", ""),
            email_from_name: env_or("EMAIL_FROM_NAME", "Website"),

            email_contact_to: env_or("EMAIL_CONTACT_TO", ""),
            email_careers_to: env_or("EMAIL_CAREERS_TO", ""),
            email_partners_to: env_or("EMAIL_PARTNERS_TO", ""),
            email_newsletter_to: env_or("EMAIL_NEWSLETTER_TO", ""),

            site_url: env_or("SITE_URL", "http://localhost"),
            company_name: env_or("COMPANY_NAME", "Company"),
            company_logo_url: env_or("COMPANY_LOGO_URL", ""),
        };

        config.validate()?;
        Ok(config)
    }

    /// Fail fast on configurations that would only break mid-request.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.recaptcha_enabled && self.recaptcha_secret_key.is_empty() {
            anyhow::bail!("RECAPTCHA_ENABLED is set but RECAPTCHA_SECRET_KEY is empty");
        }
        if self.recaptcha_enabled && self.recaptcha_verify_url.is_empty() {
            anyhow::bail!("RECAPTCHA_ENABLED is set but RECAPTCHA_VERIFY_URL is empty");
        }
        if !(0.0..=1.0).contains(&self.recaptcha_min_score) {
            anyhow::bail!(
                "RECAPTCHA_MIN_SCORE must be within 0.0..=1.0, got {}",
                self.recaptcha_min_score
            );
        }
        if self.smtp_enabled {
            if self.smtp_host.is_empty() {
                anyhow::bail!("SMTP_ENABLED is set but SMTP_HOST is empty");
            }
            if self.smtp_username.is_empty() || self.smtp_password.is_empty() {
                anyhow::bail!("SMTP_ENABLED is set but SMTP credentials are incomplete");
            }
            if self.email_from_address.is_empty() {
                anyhow::bail!("SMTP_ENABLED is set but EMAIL_FROM_ADDRESS is empty");
            }
        }
        if self.upload_enabled && self.upload_dir.is_empty() {
            anyhow::bail!("UPLOAD_ENABLED is set but UPLOAD_DIR is empty");
        }
        if self.rate_limit_enabled && self.rate_limit_max_attempts == 0 {
            anyhow::bail!("RATE_LIMIT_MAX_ATTEMPTS must be at least 1");
        }
        Ok(())
    }

    pub fn upload_max_size_mb(&self) -> usize {
        self.upload_max_size_bytes / (1024 * 1024)
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

fn env_parse<T>(key: &str, default: T) -> Result<T, anyhow::Error>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}

fn env_list(key: &str) -> Vec<String> {
    env::var(key)
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
