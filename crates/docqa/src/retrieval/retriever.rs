//! Retriever seam used by the question router

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::providers::EmbeddingProvider;
use crate::types::RetrievedPassage;

use super::index::DocumentIndex;

/// Top-k passage lookup for a query string
///
/// An empty result is a valid "no match" answer.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn get(&self, query: &str) -> Result<Vec<RetrievedPassage>>;
}

/// Retriever over a session's [`DocumentIndex`]
pub struct IndexRetriever {
    index: Arc<DocumentIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    top_k: usize,
}

impl IndexRetriever {
    pub fn new(index: Arc<DocumentIndex>, embedder: Arc<dyn EmbeddingProvider>, top_k: usize) -> Self {
        Self {
            index,
            embedder,
            top_k,
        }
    }
}

#[async_trait]
impl Retriever for IndexRetriever {
    async fn get(&self, query: &str) -> Result<Vec<RetrievedPassage>> {
        let query_embedding = self.embedder.embed(query).await?;
        let passages = self.index.search(&query_embedding, self.top_k)?;
        tracing::debug!("Retrieved {} passages", passages.len());
        Ok(passages)
    }
}
