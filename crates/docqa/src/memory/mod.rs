//! Short-term conversation memory

mod conversation;

pub use conversation::ConversationMemory;
