//! Question pipeline and document loading for a session

use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::generation::{validate_safety, OutputValidator, QuestionRouter};
use crate::ingestion::{PdfExtractor, TextChunker};
use crate::providers::{self, EmbeddingProvider, LanguageModel};
use crate::retrieval::{cleanup_session_storage, replace_session_storage, DocumentIndex, IndexRetriever};
use crate::types::{AskResponse, DocumentMetadata, DocumentSummary, SourceRef};

use super::state::{LoadedDocument, Session};

/// Shared, stateless answering engine; all per-user state lives in [`Session`]
pub struct Assistant {
    config: AppConfig,
    extractor: PdfExtractor,
    chunker: TextChunker,
    embedder: Arc<dyn EmbeddingProvider>,
    router: QuestionRouter,
    validator: OutputValidator,
}

impl Assistant {
    pub fn new(
        config: AppConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LanguageModel>,
    ) -> Self {
        let extractor = PdfExtractor::new(config.extraction.clone());
        let chunker = TextChunker::new(config.chunking.chunk_size, config.chunking.chunk_overlap);
        let router = QuestionRouter::new(
            llm,
            config.retrieval.top_k,
            config.memory.prompt_history_lines,
        );

        Self {
            config,
            extractor,
            chunker,
            embedder,
            router,
            validator: OutputValidator::new(),
        }
    }

    /// Build with the providers selected in `config`
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let embedder = providers::embedding_from_config(&config)?;
        let llm = providers::llm_from_config(&config)?;
        Ok(Self::new(config, embedder, llm))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn new_session(&self) -> Session {
        Session::new(self.config.memory.window_turns)
    }

    /// Answer one question and record the turn
    ///
    /// Memory is only updated when an answer is produced; a failed model
    /// call leaves the session untouched.
    pub async fn ask(&self, session: &mut Session, question: &str) -> Result<AskResponse> {
        let index = match session.document() {
            Some(document) => Arc::clone(&document.index),
            None => return Err(Error::NoDocumentLoaded),
        };

        validate_safety(question)?;

        let retriever = IndexRetriever::new(index, Arc::clone(&self.embedder), self.config.retrieval.top_k);
        let result = self.router.route(question, session.memory(), &retriever).await?;

        let (answer, accepted) = if result.model_invoked {
            let validation = self
                .validator
                .validate(&result.answer, &result.passages, result.classification);
            if let Some(reason) = validation.reason {
                tracing::warn!("Answer rejected: {:?}", reason);
            }
            (validation.answer, validation.accepted)
        } else {
            (result.answer, false)
        };

        session.record_turn(question, &answer);

        let sources = if accepted {
            result.passages.iter().map(SourceRef::from_passage).collect()
        } else {
            Vec::new()
        };

        Ok(AskResponse {
            answer,
            classification: result.classification,
            accepted,
            sources,
        })
    }

    /// Extract, index and install a document, replacing any previous one
    ///
    /// A byte-identical re-upload keeps the current index and history. On
    /// any failure the session keeps its previous state.
    pub async fn load_document(
        &self,
        session: &mut Session,
        filename: &str,
        data: Vec<u8>,
    ) -> Result<DocumentSummary> {
        let filename = Path::new(filename)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| Error::UnsupportedFileType("missing filename".to_string()))?
            .to_string();

        let content_hash = hex::encode(Sha256::digest(&data));
        if let Some(current) = session.document() {
            if current.content_hash == content_hash {
                tracing::info!("{} is already loaded, keeping current index", filename);
                return Ok(current.summary());
            }
        }

        let extracted = self.extractor.extract(&filename, data.clone()).await?;
        tracing::info!(
            "Extracted {} characters from {} via {}",
            extracted.text.len(),
            filename,
            extracted.method.display_name()
        );

        let metadata = DocumentMetadata::new(&filename, session.id(), &content_hash, extracted.method)
            .with_page_count(extracted.page_count);
        let index = DocumentIndex::build(&extracted.text, metadata, &self.chunker, self.embedder.as_ref())
            .await?
            .ok_or_else(|| Error::unreadable(format!("{} produced no indexable text", filename)))?;

        replace_session_storage(&self.config.storage, session.id(), &filename, &data, &index).await?;

        let document = LoadedDocument {
            filename,
            content_hash,
            index: Arc::new(index),
        };
        let summary = document.summary();
        session.replace_document(document);

        tracing::info!(
            "Document processed: {} ({} chunks)",
            summary.filename,
            summary.chunk_count
        );
        Ok(summary)
    }

    /// Clear conversation history, keep the document
    pub fn clear_conversation(&self, session: &mut Session) {
        session.clear_conversation();
    }

    /// Discard document, history and on-disk storage
    pub async fn reset(&self, session: &mut Session) -> Result<()> {
        session.reset();
        cleanup_session_storage(&self.config.storage, session.id()).await
    }
}
