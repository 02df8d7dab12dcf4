//! Error types module
//!
//! The submission pipeline's failure taxonomy. None of these are fatal
//! process errors: every variant is converted into a JSON failure body by the
//! API crate. `Internal` exists for genuinely unexpected failures (storage IO
//! and the like); transport failures during CAPTCHA verification never reach
//! this enum — the verifier fails closed and reports `CaptchaFailed`.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected rejections (validation, rate limit)
    Debug,
    /// Security-relevant rejections worth watching
    Warn,
    /// Unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Too many submissions for this client")]
    RateLimited,

    #[error("Anti-forgery token missing or mismatched")]
    AntiForgeryInvalid,

    #[error("CAPTCHA verification rejected: {0}")]
    CaptchaFailed(String),

    #[error("Field validation failed")]
    ValidationFailed(Vec<String>),

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Attachment rejected")]
    AttachmentError(Vec<String>),

    #[error("Notification dispatch failed: {0}")]
    DispatchFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Human-readable error strings for the response body's `errors` array.
    ///
    /// Rate-limit/anti-forgery/CAPTCHA rejections carry exactly one message;
    /// validation and attachment failures may carry several, since those
    /// stages accumulate instead of short-circuiting internally.
    pub fn error_strings(&self) -> Vec<String> {
        match self {
            AppError::RateLimited => {
                vec!["Too many submissions. Please try again later.".to_string()]
            }
            AppError::AntiForgeryInvalid => {
                vec!["Invalid security token. Please refresh and try again.".to_string()]
            }
            AppError::CaptchaFailed(detail) => vec![detail.clone()],
            AppError::ValidationFailed(errors) => errors.clone(),
            AppError::InvalidEmail => vec!["Invalid email address.".to_string()],
            AppError::AttachmentError(errors) => errors.clone(),
            AppError::DispatchFailed(detail) => vec![detail.clone()],
            AppError::Internal(_) => vec!["An unexpected error occurred.".to_string()],
        }
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            AppError::ValidationFailed(_) | AppError::InvalidEmail | AppError::RateLimited => {
                LogLevel::Debug
            }
            AppError::AntiForgeryInvalid
            | AppError::CaptchaFailed(_)
            | AppError::AttachmentError(_) => LogLevel::Warn,
            AppError::DispatchFailed(_) | AppError::Internal(_) => LogLevel::Error,
        }
    }

    /// Variant name for structured logs.
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::RateLimited => "RateLimited",
            AppError::AntiForgeryInvalid => "AntiForgeryInvalid",
            AppError::CaptchaFailed(_) => "CaptchaFailed",
            AppError::ValidationFailed(_) => "ValidationFailed",
            AppError::InvalidEmail => "InvalidEmail",
            AppError::AttachmentError(_) => "AttachmentError",
            AppError::DispatchFailed(_) => "DispatchFailed",
            AppError::Internal(_) => "Internal",
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}
