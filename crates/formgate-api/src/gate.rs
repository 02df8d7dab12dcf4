//! The submission gate.
//!
//! Every form runs the same fixed pipeline: rate limit, honeypot (where the
//! form has one), anti-forgery, CAPTCHA, validation, attachment handling
//! (career only), dispatch. The first failing stage short-circuits the rest;
//! a honeypot hit short-circuits into a fake success with no further side
//! effects. Stage order is encoded in `next_stage` so it can be asserted
//! directly.

use crate::extract::FormPayload;
use crate::forms::{FormSpec, HONEYPOT_FAKE_SUCCESS};
use crate::response::FormResponse;
use crate::security::rate_limit::client_identity;
use crate::services::mailer::{EmailAttachment, OutgoingEmail};
use crate::services::template;
use crate::state::AppState;
use formgate_captcha::ChallengeStatus;
use formgate_core::error::LogLevel;
use formgate_core::{validate_email, validate_required, AppError, AttachmentRecord, FieldMap};
use formgate_storage::generate_stored_name;

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStage {
    Start,
    RateLimit,
    Honeypot,
    AntiForgery,
    Captcha,
    Validation,
    Attachment,
    Dispatch,
    Done,
}

/// The stage that follows `stage` for a form described by `spec`. Forms
/// without a honeypot or without attachment support skip those stages.
pub fn next_stage(stage: GateStage, spec: &FormSpec) -> GateStage {
    match stage {
        GateStage::Start => GateStage::RateLimit,
        GateStage::RateLimit => {
            if spec.honeypot_field.is_some() {
                GateStage::Honeypot
            } else {
                GateStage::AntiForgery
            }
        }
        GateStage::Honeypot => GateStage::AntiForgery,
        GateStage::AntiForgery => GateStage::Captcha,
        GateStage::Captcha => GateStage::Validation,
        GateStage::Validation => {
            if spec.accepts_attachment {
                GateStage::Attachment
            } else {
                GateStage::Dispatch
            }
        }
        GateStage::Attachment => GateStage::Dispatch,
        GateStage::Dispatch => GateStage::Done,
        GateStage::Done => GateStage::Done,
    }
}

enum Outcome {
    Accepted,
    FakeAccepted,
    Rejected(AppError),
}

/// State accumulated as stages pass.
#[derive(Default)]
struct GateContext {
    data: FieldMap,
    attachment: Option<AttachmentRecord>,
    attachment_data: Option<bytes::Bytes>,
}

/// Run a submission through the full pipeline and produce the response body.
pub async fn run(
    state: &AppState,
    spec: &'static FormSpec,
    session_id: &str,
    payload: FormPayload,
) -> FormResponse {
    let client = client_identity(&payload.client_ip);

    match drive(state, spec, session_id, &payload).await {
        Outcome::Accepted => {
            tracing::info!(form = %spec.kind, client = %client, "Submission accepted");
            FormResponse::ok(spec.success_message())
        }
        Outcome::FakeAccepted => {
            tracing::warn!(form = %spec.kind, client = %client, "Honeypot tripped");
            FormResponse::ok(HONEYPOT_FAKE_SUCCESS)
        }
        Outcome::Rejected(error) => {
            match error.log_level() {
                LogLevel::Debug => tracing::debug!(
                    form = %spec.kind, client = %client,
                    error_type = error.error_type(), "Submission rejected"
                ),
                LogLevel::Warn => tracing::warn!(
                    form = %spec.kind, client = %client,
                    error_type = error.error_type(), "Submission rejected"
                ),
                LogLevel::Error => tracing::error!(
                    form = %spec.kind, client = %client,
                    error_type = error.error_type(), error = %error, "Submission failed"
                ),
            }
            FormResponse::fail(rejection_message(spec, &error, state), error.error_strings())
        }
    }
}

async fn drive(
    state: &AppState,
    spec: &'static FormSpec,
    session_id: &str,
    payload: &FormPayload,
) -> Outcome {
    let mut ctx = GateContext::default();
    let mut stage = GateStage::Start;

    loop {
        stage = next_stage(stage, spec);
        let result = match stage {
            // Start is never re-entered; every transition leaves it.
            GateStage::Start => Ok(()),
            GateStage::RateLimit => check_rate_limit(state, spec, session_id, payload).await,
            GateStage::Honeypot => {
                if honeypot_tripped(spec, payload) {
                    return Outcome::FakeAccepted;
                }
                Ok(())
            }
            GateStage::AntiForgery => check_anti_forgery(state, session_id, payload).await,
            GateStage::Captcha => check_captcha(state, spec, payload).await,
            GateStage::Validation => validate(spec, payload, &mut ctx),
            GateStage::Attachment => handle_attachment(state, payload, &mut ctx).await,
            GateStage::Dispatch => dispatch(state, spec, payload, &ctx).await,
            GateStage::Done => return Outcome::Accepted,
        };

        if let Err(error) = result {
            return Outcome::Rejected(error);
        }
    }
}

async fn check_rate_limit(
    state: &AppState,
    spec: &FormSpec,
    session_id: &str,
    payload: &FormPayload,
) -> Result<(), AppError> {
    let allowed = state
        .sessions
        .with_session(session_id, |session| {
            state
                .rate_limiter
                .check(session, spec.kind, &payload.client_ip)
        })
        .await;
    if allowed {
        Ok(())
    } else {
        Err(AppError::RateLimited)
    }
}

fn honeypot_tripped(spec: &FormSpec, payload: &FormPayload) -> bool {
    spec.honeypot_field
        .map(|field| !payload.fields.get_or_empty(field).is_empty())
        .unwrap_or(false)
}

async fn check_anti_forgery(
    state: &AppState,
    session_id: &str,
    payload: &FormPayload,
) -> Result<(), AppError> {
    let supplied = payload.fields.get_or_empty("csrf_token").to_string();
    let valid = state
        .sessions
        .with_session(session_id, |session| state.csrf.verify(session, &supplied))
        .await;
    if valid {
        Ok(())
    } else {
        Err(AppError::AntiForgeryInvalid)
    }
}

async fn check_captcha(
    state: &AppState,
    spec: &FormSpec,
    payload: &FormPayload,
) -> Result<(), AppError> {
    let token = payload.fields.get_or_empty("g-recaptcha-response");
    match state.captcha.verify(token, spec.captcha_action).await {
        ChallengeStatus::Verified => Ok(()),
        ChallengeStatus::Failed(reason) => Err(AppError::CaptchaFailed(reason)),
    }
}

fn validate(
    spec: &FormSpec,
    payload: &FormPayload,
    ctx: &mut GateContext,
) -> Result<(), AppError> {
    let data = spec.sanitized(&payload.fields);

    let errors = validate_required(spec.required, &data);
    if !errors.is_empty() {
        return Err(AppError::ValidationFailed(errors));
    }

    if !validate_email(data.get_or_empty("email")) {
        return Err(AppError::InvalidEmail);
    }

    ctx.data = data;
    Ok(())
}

async fn handle_attachment(
    state: &AppState,
    payload: &FormPayload,
    ctx: &mut GateContext,
) -> Result<(), AppError> {
    let Some(upload) = &payload.upload else {
        return Ok(());
    };

    let config = &state.config;
    if !config.upload_enabled {
        return Err(AppError::AttachmentError(vec![
            "File uploads are disabled.".to_string(),
        ]));
    }

    if upload.data.len() > config.upload_max_size_bytes {
        return Err(AppError::AttachmentError(vec![format!(
            "File size exceeds maximum limit of {}MB.",
            config.upload_max_size_mb()
        )]));
    }

    let ext = formgate_storage::extension_of(&upload.filename);
    if !config.upload_allowed_extensions.contains(&ext) {
        return Err(AppError::AttachmentError(vec![format!(
            "Invalid file type. Allowed: {}",
            config.upload_allowed_extensions.join(", ")
        )]));
    }

    let stored_name = generate_stored_name(&upload.filename);
    let path = state
        .storage
        .store(&stored_name, upload.data.clone())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Attachment store failed");
            AppError::AttachmentError(vec!["Failed to save uploaded file.".to_string()])
        })?;

    ctx.attachment = Some(AttachmentRecord {
        original_name: upload.filename.clone(),
        stored_name,
        path,
        size: upload.data.len() as u64,
        content_type: upload.content_type.clone(),
    });
    ctx.attachment_data = Some(upload.data.clone());
    Ok(())
}

async fn dispatch(
    state: &AppState,
    spec: &FormSpec,
    payload: &FormPayload,
    ctx: &GateContext,
) -> Result<(), AppError> {
    let rows = spec.email_rows(&ctx.data, ctx.attachment.as_ref(), &payload.client_ip);
    let html_body = template::render_notification(spec.notification_title, &rows, &state.branding);

    let mut attachments = Vec::new();
    if let (Some(record), Some(data)) = (&ctx.attachment, &ctx.attachment_data) {
        attachments.push(EmailAttachment {
            filename: record.original_name.clone(),
            content_type: record.content_type.clone(),
            data: data.to_vec(),
        });
    }

    let email = OutgoingEmail {
        to: spec.recipient(&state.config).to_string(),
        subject: spec.subject(&ctx.data),
        html_body,
        reply_to: spec.reply_to(&ctx.data),
        attachments,
    };

    if let Err(error) = state.mailer.send(email).await {
        // A stored resume that no one will ever read gets cleaned up.
        if let Some(record) = &ctx.attachment {
            if let Err(delete_error) = state.storage.delete(&record.stored_name).await {
                tracing::error!(
                    stored_name = %record.stored_name,
                    error = %delete_error,
                    "Failed to clean up attachment after dispatch failure"
                );
            }
        }
        return Err(AppError::DispatchFailed(error.to_string()));
    }

    if spec.sends_welcome() {
        send_welcome(state, ctx).await;
    }

    Ok(())
}

/// Best-effort welcome email to a new subscriber. The subscription already
/// succeeded; a failure here is logged and never surfaces to the client.
async fn send_welcome(state: &AppState, ctx: &GateContext) {
    let subscriber = ctx.data.get_or_empty("email").to_string();
    let email = OutgoingEmail {
        to: subscriber.clone(),
        subject: format!("Welcome to {} Newsletter", state.branding.company_name),
        html_body: template::render_newsletter_welcome(&state.branding),
        reply_to: Some(state.config.email_from_address.clone()),
        attachments: Vec::new(),
    };

    if let Err(error) = state.mailer.send(email).await {
        tracing::warn!(to = %subscriber, error = %error, "Welcome email failed");
    }
}

/// Client-facing top-level message for a rejection. The per-stage detail
/// lives in the response's `errors` array.
fn rejection_message(spec: &FormSpec, error: &AppError, state: &AppState) -> String {
    match error {
        AppError::RateLimited => "Too many submissions. Please try again in an hour.".to_string(),
        AppError::AntiForgeryInvalid => {
            "Security validation failed. Please refresh the page and try again.".to_string()
        }
        AppError::CaptchaFailed(_) => {
            "reCAPTCHA verification failed. Please try again.".to_string()
        }
        AppError::ValidationFailed(_) => spec.validation_failure_message().to_string(),
        AppError::InvalidEmail => "Please enter a valid email address.".to_string(),
        AppError::AttachmentError(errors) => {
            format!("Error processing your application: {}", errors.join(", "))
        }
        AppError::DispatchFailed(_) => spec.dispatch_failure_message(&state.config),
        AppError::Internal(_) => "An unexpected error occurred. Please try again.".to_string(),
    }
}
