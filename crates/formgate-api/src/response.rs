//! Uniform JSON response envelope.
//!
//! Every form endpoint answers HTTP 200 with the same shape regardless of
//! outcome; the `success` flag is the contract, not the status code. Clients
//! submitting from static marketing pages read `message` and `errors` and
//! never branch on HTTP status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FormResponse {
    pub success: bool,
    pub message: String,
    pub data: serde_json::Value,
    pub errors: Vec<String>,
}

impl FormResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        FormResponse {
            success: true,
            message: message.into(),
            data: serde_json::json!({}),
            errors: Vec::new(),
        }
    }

    pub fn ok_with_data(message: impl Into<String>, data: serde_json::Value) -> Self {
        FormResponse {
            success: true,
            message: message.into(),
            data,
            errors: Vec::new(),
        }
    }

    pub fn fail(message: impl Into<String>, errors: Vec<String>) -> Self {
        FormResponse {
            success: false,
            message: message.into(),
            data: serde_json::json!({}),
            errors,
        }
    }
}

impl IntoResponse for FormResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
