//! docqa: ask grounded questions about a single uploaded PDF
//!
//! A session holds one document index and a short conversation memory.
//! Each question is classified (greeting, question about the conversation,
//! or document question), answered from retrieved passages or history, and
//! checked for grounding before it is shown and remembered.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod memory;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod session;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use session::{Assistant, Session, SessionManager};
pub use types::{AskResponse, QuestionClassification, RetrievedPassage};
