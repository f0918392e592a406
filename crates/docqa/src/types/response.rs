//! Answer and passage types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::conversation::ChatMessage;
use super::document::ExtractionMethod;
use super::query::QuestionClassification;

/// A retrieved text window with its source document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    /// Window text
    pub content: String,
    /// Source document identifier (original filename)
    pub source: String,
    /// Window position within the source
    pub chunk_index: u32,
    /// Cosine similarity to the query (higher is more similar)
    pub similarity: f32,
}

impl RetrievedPassage {
    pub fn new(content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            chunk_index: 0,
            similarity: 0.0,
        }
    }
}

/// Router output for a single question, consumed by the validator
#[derive(Debug, Clone)]
pub struct AnswerResult {
    /// Raw answer text
    pub answer: String,
    /// How the question was routed
    pub classification: QuestionClassification,
    /// Passages used to build the prompt, most relevant first
    pub passages: Vec<RetrievedPassage>,
    /// False when the router answered without calling the model
    pub model_invoked: bool,
}

/// Source reference returned to API clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRef {
    pub source: String,
    pub chunk_index: u32,
    pub similarity: f32,
    pub snippet: String,
}

impl SourceRef {
    const SNIPPET_CHARS: usize = 200;

    pub fn from_passage(passage: &RetrievedPassage) -> Self {
        let snippet = match passage.content.char_indices().nth(Self::SNIPPET_CHARS) {
            Some((idx, _)) => format!("{}...", &passage.content[..idx]),
            None => passage.content.clone(),
        };

        Self {
            source: passage.source.clone(),
            chunk_index: passage.chunk_index,
            similarity: passage.similarity,
            snippet,
        }
    }
}

/// Final answer surfaced to the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// Answer text exactly as recorded into conversation memory
    pub answer: String,
    /// How the question was routed
    pub classification: QuestionClassification,
    /// False when the answer is a fixed fallback instead of the model's text
    pub accepted: bool,
    /// Passages the answer was grounded on
    pub sources: Vec<SourceRef>,
}

/// Summary of a session's active document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub filename: String,
    pub content_hash: String,
    pub page_count: Option<u32>,
    pub chunk_count: usize,
    pub extraction_method: ExtractionMethod,
    pub indexed_at: DateTime<Utc>,
}

impl DocumentSummary {
    /// Greeting shown once the document is ready for questions
    pub fn welcome_message(&self) -> String {
        format!(
            "Great! I've processed '{}'. You can now ask me questions about this document.",
            self.filename
        )
    }
}

/// Session state returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub document: Option<DocumentSummary>,
    /// Turns currently held in conversation memory
    pub turns: usize,
    pub transcript: Vec<ChatMessage>,
}
