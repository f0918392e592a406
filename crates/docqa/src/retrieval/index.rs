//! In-memory cosine-similarity index over one document's chunks

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::error::{Error, Result};
use crate::ingestion::TextChunker;
use crate::providers::EmbeddingProvider;
use crate::types::{Chunk, DocumentMetadata, RetrievedPassage};

const SNAPSHOT_FILE: &str = "index.json";

/// Searchable embedding index for a single uploaded document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentIndex {
    metadata: DocumentMetadata,
    dimensions: usize,
    chunks: Vec<Chunk>,
}

impl DocumentIndex {
    /// Split, embed and index `text`
    ///
    /// Returns `Ok(None)` when the text is empty or yields no chunks.
    pub async fn build(
        text: &str,
        metadata: DocumentMetadata,
        chunker: &TextChunker,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<Option<Self>> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let windows = chunker.split(text);
        if windows.is_empty() {
            return Ok(None);
        }

        tracing::info!(
            "Embedding {} chunks of '{}' with {}",
            windows.len(),
            metadata.source,
            embedder.name()
        );
        let embeddings = embedder.embed_batch(&windows).await?;
        if embeddings.len() != windows.len() {
            return Err(Error::embedding(format!(
                "expected {} embeddings, got {}",
                windows.len(),
                embeddings.len()
            )));
        }

        let dimensions = embeddings.first().map(Vec::len).unwrap_or(0);
        if dimensions == 0 || embeddings.iter().any(|e| e.len() != dimensions) {
            return Err(Error::embedding("inconsistent embedding dimensions"));
        }

        let chunks = windows
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(i, (content, embedding))| Chunk {
                index: i as u32,
                content,
                embedding,
            })
            .collect();

        Ok(Some(Self {
            metadata,
            dimensions,
            chunks,
        }))
    }

    /// Top-k passages by cosine similarity, most similar first
    pub fn search(&self, query_embedding: &[f32], top_k: usize) -> Result<Vec<RetrievedPassage>> {
        if query_embedding.len() != self.dimensions {
            return Err(Error::VectorDb(format!(
                "query has {} dimensions, index has {}",
                query_embedding.len(),
                self.dimensions
            )));
        }

        let mut scored: Vec<(f32, &Chunk)> = self
            .chunks
            .iter()
            .map(|chunk| (cosine_similarity(query_embedding, &chunk.embedding), chunk))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(similarity, chunk)| RetrievedPassage {
                content: chunk.content.clone(),
                source: self.metadata.source.clone(),
                chunk_index: chunk.index,
                similarity,
            })
            .collect())
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Write a JSON snapshot into `dir`
    pub async fn persist(&self, dir: &Path) -> Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(SNAPSHOT_FILE);
        let json = serde_json::to_vec(self)?;
        tokio::fs::write(&path, json).await?;
        tracing::debug!("Index snapshot written to {}", path.display());
        Ok(path)
    }

    /// Load a snapshot written by [`DocumentIndex::persist`]
    pub async fn load(dir: &Path) -> Result<Self> {
        let raw = tokio::fs::read(dir.join(SNAPSHOT_FILE)).await?;
        Ok(serde_json::from_slice(&raw)?)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Directory holding one session's index snapshot
pub fn session_index_dir(index_root: &Path, session_id: Uuid) -> PathBuf {
    index_root.join(format!("session_{}", session_id))
}

/// Directory holding one session's uploaded file
pub fn session_upload_dir(upload_root: &Path, session_id: Uuid) -> PathBuf {
    upload_root.join(session_id.to_string())
}

fn staging_dir(dir: &Path) -> PathBuf {
    let mut name = dir.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".staging");
    dir.with_file_name(name)
}

async fn remove_dir_if_exists(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        tokio::fs::remove_dir_all(dir).await?;
        tracing::debug!("Removed {}", dir.display());
    }
    Ok(())
}

/// Replace a session's stored upload and index snapshot
///
/// The new files are written to staging directories first; the previous
/// storage is only removed once both are complete.
pub async fn replace_session_storage(
    storage: &StorageConfig,
    session_id: Uuid,
    filename: &str,
    data: &[u8],
    index: &DocumentIndex,
) -> Result<()> {
    let upload_dir = session_upload_dir(&storage.upload_dir, session_id);
    let index_dir = session_index_dir(&storage.index_dir, session_id);
    let staged_upload = staging_dir(&upload_dir);
    let staged_index = staging_dir(&index_dir);

    remove_dir_if_exists(&staged_upload).await?;
    remove_dir_if_exists(&staged_index).await?;

    let staged = async {
        tokio::fs::create_dir_all(&staged_upload).await?;
        tokio::fs::write(staged_upload.join(filename), data).await?;
        index.persist(&staged_index).await?;
        Ok::<_, Error>(())
    }
    .await;

    if let Err(e) = staged {
        tracing::warn!("Failed to stage storage for session {}: {}", session_id, e);
        let _ = remove_dir_if_exists(&staged_upload).await;
        let _ = remove_dir_if_exists(&staged_index).await;
        return Err(e);
    }

    cleanup_session_storage(storage, session_id).await?;
    tokio::fs::rename(&staged_upload, &upload_dir).await?;
    tokio::fs::rename(&staged_index, &index_dir).await?;
    Ok(())
}

/// Remove a session's uploaded file and index snapshot
pub async fn cleanup_session_storage(storage: &StorageConfig, session_id: Uuid) -> Result<()> {
    let dirs = [
        session_index_dir(&storage.index_dir, session_id),
        session_upload_dir(&storage.upload_dir, session_id),
    ];

    for dir in dirs {
        remove_dir_if_exists(&dir).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::local::HashEmbedder;
    use crate::types::ExtractionMethod;

    fn metadata() -> DocumentMetadata {
        DocumentMetadata::new("invoice.pdf", Uuid::new_v4(), "abc", ExtractionMethod::TextLayer)
    }

    #[tokio::test]
    async fn test_build_empty_text_is_none() {
        let embedder = HashEmbedder::new(32);
        let chunker = TextChunker::new(100, 10);
        let index = DocumentIndex::build("  \n ", metadata(), &chunker, &embedder)
            .await
            .unwrap();
        assert!(index.is_none());
    }

    #[tokio::test]
    async fn test_search_orders_by_similarity() {
        let embedder = HashEmbedder::new(256);
        let chunker = TextChunker::new(60, 0);
        let text = "The invoice total is $450 payable in March. \
                    Shipping is handled by a regional courier. \
                    Warranty coverage lasts for two years.";
        let index = DocumentIndex::build(text, metadata(), &chunker, &embedder)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(index.len(), 3);

        let query = embedder.embed("what is the invoice total").await.unwrap();
        let passages = index.search(&query, 2).unwrap();
        assert_eq!(passages.len(), 2);
        assert!(passages[0].content.contains("invoice total"));
        assert!(passages[0].similarity >= passages[1].similarity);
        assert_eq!(passages[0].source, "invoice.pdf");
    }

    #[tokio::test]
    async fn test_dimension_mismatch() {
        let embedder = HashEmbedder::new(32);
        let chunker = TextChunker::new(100, 10);
        let index = DocumentIndex::build("Some document text here.", metadata(), &chunker, &embedder)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(index.search(&[1.0, 0.0], 4), Err(Error::VectorDb(_))));
    }

    #[tokio::test]
    async fn test_persist_and_cleanup() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = StorageConfig {
            upload_dir: tmp.path().join("uploads"),
            index_dir: tmp.path().join("index"),
        };
        let embedder = HashEmbedder::new(32);
        let chunker = TextChunker::new(100, 10);
        let meta = metadata();
        let session_id = meta.session_id;
        let index = DocumentIndex::build("Persist this document text.", meta, &chunker, &embedder)
            .await
            .unwrap()
            .unwrap();

        let dir = session_index_dir(&storage.index_dir, session_id);
        index.persist(&dir).await.unwrap();
        let loaded = DocumentIndex::load(&dir).await.unwrap();
        assert_eq!(loaded.len(), index.len());
        assert_eq!(loaded.metadata(), index.metadata());

        cleanup_session_storage(&storage, session_id).await.unwrap();
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_replace_storage_keeps_previous_on_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = StorageConfig {
            upload_dir: tmp.path().join("uploads"),
            index_dir: tmp.path().join("index"),
        };
        let embedder = HashEmbedder::new(32);
        let chunker = TextChunker::new(100, 10);
        let meta = metadata();
        let session_id = meta.session_id;
        let index = DocumentIndex::build("The invoice total is $450.", meta, &chunker, &embedder)
            .await
            .unwrap()
            .unwrap();

        replace_session_storage(&storage, session_id, "a.pdf", b"first", &index)
            .await
            .unwrap();
        let upload_dir = session_upload_dir(&storage.upload_dir, session_id);
        let index_dir = session_index_dir(&storage.index_dir, session_id);
        assert_eq!(std::fs::read(upload_dir.join("a.pdf")).unwrap(), b"first");
        assert!(!staging_dir(&upload_dir).exists());

        // A file where the staging directory belongs makes staging fail
        std::fs::write(staging_dir(&upload_dir), b"blocked").unwrap();
        let result = replace_session_storage(&storage, session_id, "b.pdf", b"second", &index).await;
        assert!(result.is_err());

        assert_eq!(std::fs::read(upload_dir.join("a.pdf")).unwrap(), b"first");
        assert!(!upload_dir.join("b.pdf").exists());
        assert_eq!(DocumentIndex::load(&index_dir).await.unwrap().len(), index.len());
        assert!(!staging_dir(&index_dir).exists());

        std::fs::remove_file(staging_dir(&upload_dir)).unwrap();
        replace_session_storage(&storage, session_id, "b.pdf", b"second", &index)
            .await
            .unwrap();
        assert!(!upload_dir.join("a.pdf").exists());
        assert_eq!(std::fs::read(upload_dir.join("b.pdf")).unwrap(), b"second");
    }
}
