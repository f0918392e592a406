//! Per-session document index and retrieval

mod index;
mod retriever;

pub use index::{
    cleanup_session_storage, replace_session_storage, session_index_dir, session_upload_dir,
    DocumentIndex,
};
pub use retriever::{IndexRetriever, Retriever};
