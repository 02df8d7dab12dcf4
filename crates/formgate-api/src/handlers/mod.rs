//! HTTP handlers.
//!
//! One POST handler per form, all delegating to the gate, plus the token
//! issuance endpoint the pages call before their first submission and a
//! health probe. Handlers own the session cookie round-trip; everything else
//! happens behind the gate.

use crate::extract::FormPayload;
use crate::forms::FormSpec;
use crate::gate;
use crate::response::FormResponse;
use crate::session::ensure_session;
use crate::state::AppState;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::CookieJar;
use formgate_core::FormKind;
use std::sync::Arc;

pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: FormPayload,
) -> Response {
    submit(state, jar, FormKind::Contact, payload).await
}

pub async fn submit_career(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: FormPayload,
) -> Response {
    submit(state, jar, FormKind::Career, payload).await
}

pub async fn submit_partner(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: FormPayload,
) -> Response {
    submit(state, jar, FormKind::Partner, payload).await
}

pub async fn submit_newsletter(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: FormPayload,
) -> Response {
    submit(state, jar, FormKind::Newsletter, payload).await
}

async fn submit(
    state: Arc<AppState>,
    jar: CookieJar,
    kind: FormKind,
    payload: FormPayload,
) -> Response {
    let (session_id, jar) = ensure_session(jar);
    let response = gate::run(&state, FormSpec::of(kind), &session_id, payload).await;
    (jar, response).into_response()
}

/// Issue (or re-issue) the session's anti-forgery token. Idempotent within a
/// session: the page can call this on every load and embed whatever it gets.
pub async fn csrf_token(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let (session_id, jar) = ensure_session(jar);
    let token = state
        .sessions
        .with_session(&session_id, |session| state.csrf.issue(session))
        .await;

    let response = FormResponse::ok_with_data(
        "Token issued.",
        serde_json::json!({ "csrf_token": token }),
    );
    (jar, response).into_response()
}

pub async fn health() -> Response {
    Json(serde_json::json!({ "status": "ok" })).into_response()
}
