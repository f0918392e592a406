//! Question types

use serde::{Deserialize, Serialize};

/// Routing class of an incoming question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionClassification {
    /// Exact-match greeting; no retrieval
    Greeting,
    /// Question about the conversation itself; answered from history only
    ConversationMeta,
    /// Anything else; answered from retrieved document passages
    Document,
}

impl QuestionClassification {
    /// Whether this class requires retrieval
    pub fn needs_retrieval(&self) -> bool {
        matches!(self, Self::Document)
    }

    /// Stable label for logs and API responses
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::ConversationMeta => "conversation_meta",
            Self::Document => "document",
        }
    }
}

impl std::fmt::Display for QuestionClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ask request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// The user's question
    pub question: String,
}
