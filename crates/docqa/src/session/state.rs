//! Per-user session state

use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::memory::ConversationMemory;
use crate::retrieval::DocumentIndex;
use crate::types::{ChatMessage, ConversationTurn, DocumentSummary, SessionInfo};

/// The document a session answers questions about
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub filename: String,
    pub content_hash: String,
    pub index: Arc<DocumentIndex>,
}

impl LoadedDocument {
    pub fn summary(&self) -> DocumentSummary {
        let metadata = self.index.metadata();
        DocumentSummary {
            filename: self.filename.clone(),
            content_hash: self.content_hash.clone(),
            page_count: metadata.page_count,
            chunk_count: self.index.len(),
            extraction_method: metadata.extraction_method,
            indexed_at: metadata.indexed_at,
        }
    }
}

/// One user's document, conversation memory and chat log
///
/// Document and memory only change together: installing a new document
/// or resetting always clears the conversation in the same call.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    created_at: DateTime<Utc>,
    document: Option<LoadedDocument>,
    memory: ConversationMemory,
    transcript: Vec<ChatMessage>,
}

impl Session {
    /// Fresh session: new id, empty memory, no document
    pub fn new(window_turns: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            document: None,
            memory: ConversationMemory::new(window_turns),
            transcript: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn document(&self) -> Option<&LoadedDocument> {
        self.document.as_ref()
    }

    pub fn has_document(&self) -> bool {
        self.document.is_some()
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Install a new document, discarding the previous one and all history
    pub fn replace_document(&mut self, document: LoadedDocument) -> Option<LoadedDocument> {
        self.memory.clear();
        self.transcript.clear();
        self.document.replace(document)
    }

    /// Drop conversation history, keep the document
    pub fn clear_conversation(&mut self) {
        self.memory.clear();
        self.transcript.clear();
        tracing::info!("Session {} conversation cleared", self.id);
    }

    /// Drop document, history and chat log
    pub fn reset(&mut self) -> Option<LoadedDocument> {
        self.memory.clear();
        self.transcript.clear();
        tracing::info!("Session {} reset", self.id);
        self.document.take()
    }

    /// Record one answered question in memory and in the chat log
    pub fn record_turn(&mut self, question: &str, answer: &str) {
        self.memory.append(ConversationTurn::new(question, answer));
        self.transcript.push(ChatMessage::user(question));
        self.transcript.push(ChatMessage::assistant(answer));
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            session_id: self.id,
            created_at: self.created_at,
            document: self.document.as_ref().map(LoadedDocument::summary),
            turns: self.memory.len(),
            transcript: self.transcript.clone(),
        }
    }
}
