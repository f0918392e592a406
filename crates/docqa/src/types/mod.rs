//! Core data types for documents, questions and answers

pub mod conversation;
pub mod document;
pub mod query;
pub mod response;

pub use conversation::{ChatMessage, ChatRole, ConversationTurn};
pub use document::{Chunk, DocumentMetadata, ExtractionMethod};
pub use query::{AskRequest, QuestionClassification};
pub use response::{
    AnswerResult, AskResponse, DocumentSummary, RetrievedPassage, SessionInfo, SourceRef,
};
