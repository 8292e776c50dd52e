//! Presentation shell: server-rendered pages, form posts and a small JSON API.
//!
//! Every page works without JavaScript. Forms post and redirect back to the
//! chat view, and the chat view reloads itself once a second while a turn is
//! in flight.

pub mod handlers;
pub mod markdown;
pub mod pages;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::export::TranscriptExporter;
use crate::session::ChatSession;

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The chat session every page and API call operates on.
    pub session: ChatSession,
    /// PDF exporter for the transcript.
    pub exporter: TranscriptExporter,
}

impl AppState {
    pub fn new(session: ChatSession) -> Self {
        Self {
            session,
            exporter: TranscriptExporter::default(),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        // HTML pages
        .route("/", get(handlers::landing))
        .route("/chat", get(handlers::chat_view))
        .route("/chat/send", post(handlers::send_form))
        .route("/chat/clear", post(handlers::clear_form))
        .route("/chat/export", get(handlers::export_pdf))
        // API routes
        .route(
            "/api/chat",
            get(handlers::api_snapshot)
                .post(handlers::api_send)
                .delete(handlers::api_clear),
        )
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
