//! Embedding seam shared by indexing and retrieval

use async_trait::async_trait;
use crate::error::Result;

/// Turns document chunks and questions into vectors
///
/// A session's index and its queries must come from the same provider;
/// the index rejects query vectors of a different length.
///
/// Implementations:
/// - `OllamaEmbedder`: `/api/embeddings` on a local Ollama server
/// - `HashEmbedder`: offline feature hashing
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one question or chunk
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed every chunk of a document, in order
    async fn embed_batch(&self, chunks: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            vectors.push(self.embed(chunk).await?);
        }
        Ok(vectors)
    }

    /// Vector length this provider produces
    fn dimensions(&self) -> usize;

    /// Provider name for logging
    fn name(&self) -> &str;
}
