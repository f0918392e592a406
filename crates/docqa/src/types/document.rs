//! Document and chunk types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How the text of a document was obtained
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Embedded text layer (pdf-extract)
    TextLayer,
    /// Raw content-stream scan (lopdf)
    ContentStream,
    /// Optical character recognition (pdftoppm + tesseract)
    Ocr,
}

impl ExtractionMethod {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::TextLayer => "text layer",
            Self::ContentStream => "content stream",
            Self::Ocr => "OCR",
        }
    }
}

/// Metadata attached to every chunk of an indexed document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentMetadata {
    /// Document ID
    pub id: Uuid,
    /// Original filename, used as the passage source identifier
    pub source: String,
    /// Owning session
    pub session_id: Uuid,
    /// SHA-256 of the uploaded bytes
    pub content_hash: String,
    /// Page count when known
    pub page_count: Option<u32>,
    /// Extraction path that produced the text
    pub extraction_method: ExtractionMethod,
    /// Indexing time
    pub indexed_at: DateTime<Utc>,
}

impl DocumentMetadata {
    /// Create metadata for a freshly uploaded document
    pub fn new(
        source: impl Into<String>,
        session_id: Uuid,
        content_hash: impl Into<String>,
        extraction_method: ExtractionMethod,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: source.into(),
            session_id,
            content_hash: content_hash.into(),
            page_count: None,
            extraction_method,
            indexed_at: Utc::now(),
        }
    }

    /// Set the page count
    pub fn with_page_count(mut self, pages: Option<u32>) -> Self {
        self.page_count = pages;
        self
    }
}

/// An overlapping window of document text with its embedding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Position of the window within the document
    pub index: u32,
    /// Window text
    pub content: String,
    /// Embedding vector
    pub embedding: Vec<f32>,
}
