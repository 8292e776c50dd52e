//! Transcript export to PDF.
//!
//! Export is two steps: [`Paginator::layout`] resolves the position of every
//! heading, shaded box and text line, then [`pdf::render`] paints the pages.
//! Both steps are deterministic, so exporting the same history twice yields
//! the same pages and the same bytes.
//!
//! # Example
//!
//! ```rust,ignore
//! use heya::export::TranscriptExporter;
//!
//! let doc = TranscriptExporter::default().export(&history)?;
//! std::fs::write(doc.file_name, &doc.bytes)?;
//! ```

pub mod layout;
pub mod metrics;
pub mod pdf;

pub use layout::{Page, PageGeometry, Paginator, PlacedMessage};

use crate::error::ExportError;
use crate::session::ChatHistory;

/// File name offered for the downloaded transcript.
pub const EXPORT_FILE_NAME: &str = "chat-history.pdf";

/// A rendered transcript.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub file_name: &'static str,
    pub pages: Vec<Page>,
    pub bytes: Vec<u8>,
}

impl ExportedDocument {
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Produces paginated PDF snapshots of a chat history.
#[derive(Debug, Clone, Copy, Default)]
pub struct TranscriptExporter {
    paginator: Paginator,
}

impl TranscriptExporter {
    #[must_use]
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            paginator: Paginator::new(geometry),
        }
    }

    /// Lay out and render `history`.
    pub fn export(&self, history: &ChatHistory) -> Result<ExportedDocument, ExportError> {
        let pages = self.paginator.layout(history);
        let bytes = pdf::render(&pages, self.paginator.geometry())?;

        tracing::info!(
            name: "export.rendered",
            message_count = history.len(),
            page_count = pages.len(),
            size_bytes = bytes.len(),
            "Transcript exported"
        );

        Ok(ExportedDocument {
            file_name: EXPORT_FILE_NAME,
            pages,
            bytes,
        })
    }
}
