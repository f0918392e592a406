//! Sessions and the per-question pipeline

mod assistant;
mod manager;
mod state;

pub use assistant::Assistant;
pub use manager::{SessionHandle, SessionManager};
pub use state::{LoadedDocument, Session};
