//! HeyA! chat
//!
//! A single-user chat front end for a question/answer inference endpoint.
//! Questions are posted as `{"question": ...}` and the `response` field of
//! the reply becomes the bot's message. The transcript is kept on disk
//! between runs and can be downloaded as a paginated PDF.
//!
//! # Architecture
//!
//! - **Server**: Axum HTTP server rendering HTML pages, plus a JSON API
//! - **Session**: one chat session owning the transcript and turn state
//! - **Inference**: HTTP client for the question/answer endpoint
//! - **Persistence**: history stores keyed by name (file or in-memory)
//! - **Export**: deterministic layout and PDF rendering of the transcript
//!
//! # Modules
//!
//! - [`session`]: Chat session controller and message types
//! - [`inference`]: Inference client trait and HTTP implementation
//! - [`persistence`]: History store trait and backends
//! - [`export`]: Transcript pagination and PDF output
//! - [`web`]: Routes, handlers and page rendering

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod config;
pub mod error;
pub mod export;
pub mod inference;
pub mod persistence;
pub mod server;
pub mod session;
pub mod web;

pub use web::AppState;
