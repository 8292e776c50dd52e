//! Route handlers.

use axum::{
    Form, Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};

use super::{AppState, pages};
use crate::session::{ChatSession, SessionBusy, SessionSnapshot};

/// Query string accepted by the chat view.
#[derive(Debug, Deserialize)]
pub struct ChatQuery {
    /// Question carried over from the landing page.
    pub q: Option<String>,
}

/// Form posted by the chat input.
#[derive(Debug, Deserialize)]
pub struct SendForm {
    #[serde(default)]
    pub message: String,
}

/// JSON body for `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Page Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /`
pub async fn landing() -> Html<String> {
    Html(pages::landing_page())
}

/// `GET /chat`
///
/// A non-blank `q` is submitted once in the background, then the browser
/// is sent back to the plain chat view so a reload does not resend it.
pub async fn chat_view(State(state): State<AppState>, Query(query): Query<ChatQuery>) -> Response {
    if let Some(q) = query.q.filter(|q| !q.trim().is_empty()) {
        start_in_background(&state.session, q).await;
        return Redirect::to("/chat").into_response();
    }

    let snapshot = state.session.snapshot().await;
    Html(pages::chat_page(&snapshot)).into_response()
}

/// `POST /chat/send`
pub async fn send_form(State(state): State<AppState>, Form(form): Form<SendForm>) -> Redirect {
    start_in_background(&state.session, form.message).await;
    Redirect::to("/chat")
}

/// `POST /chat/clear`
pub async fn clear_form(State(state): State<AppState>) -> Redirect {
    state.session.clear().await;
    Redirect::to("/chat")
}

/// `GET /chat/export`
pub async fn export_pdf(State(state): State<AppState>) -> Result<Response, (StatusCode, String)> {
    let history = state.session.history().await;
    let document = state.exporter.export(&history).map_err(|e| {
        tracing::error!(name: "export.failed", error = %e, "Transcript export failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let disposition = format!("attachment; filename=\"{}\"", document.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.bytes,
    )
        .into_response())
}

async fn start_in_background(session: &ChatSession, text: String) {
    match session.try_begin_turn(Some(text)).await {
        Ok(Some(turn)) => {
            tokio::spawn(turn.finish());
        }
        Ok(None) => {}
        Err(SessionBusy) => {
            tracing::info!(name: "chat.submit.rejected", "Turn in flight, submission dropped");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON API Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/chat`
pub async fn api_snapshot(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.snapshot().await)
}

/// `POST /api/chat`
///
/// Runs the turn to completion and answers with the resulting state.
pub async fn api_send(
    State(state): State<AppState>,
    Json(req): Json<SendRequest>,
) -> Result<Json<SessionSnapshot>, (StatusCode, String)> {
    let turn = state
        .session
        .try_begin_turn(Some(req.message))
        .await
        .map_err(|e| (StatusCode::CONFLICT, e.to_string()))?;

    // Spawned so the turn still completes if the client goes away.
    if let Some(turn) = turn {
        tokio::spawn(turn.finish())
            .await
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    }
    Ok(Json(state.session.snapshot().await))
}

/// `DELETE /api/chat`
pub async fn api_clear(State(state): State<AppState>) -> StatusCode {
    state.session.clear().await;
    StatusCode::NO_CONTENT
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
