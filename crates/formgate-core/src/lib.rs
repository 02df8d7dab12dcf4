//! Formgate Core Library
//!
//! This crate provides the domain models, error types, configuration, and the
//! sanitizer/validator shared by all formgate components.

pub mod config;
pub mod error;
pub mod models;
pub mod sanitize;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::AppError;
pub use models::{AttachmentRecord, CaptchaVerdict, FieldMap, FormKind};
pub use sanitize::{sanitize, sanitize_map, SanitizeKind};
pub use validation::{humanize_field_name, validate_email, validate_required};
