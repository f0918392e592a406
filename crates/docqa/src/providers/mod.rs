//! Provider abstractions for embeddings and the language model
//!
//! Trait-based seams so the question pipeline can run against a local
//! Ollama server, the Groq API, or in-process fakes in tests.

pub mod embedding;
pub mod groq;
pub mod llm;
pub mod local;
pub mod ollama;

use std::sync::Arc;

pub use embedding::EmbeddingProvider;
pub use llm::LanguageModel;

use crate::config::{AppConfig, EmbeddingBackend, LlmBackend};
use crate::error::Result;

/// Build the configured embedding provider
pub fn embedding_from_config(config: &AppConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    let provider: Arc<dyn EmbeddingProvider> = match config.embeddings.backend {
        EmbeddingBackend::Ollama => Arc::new(ollama::OllamaEmbedder::new(&config.embeddings)?),
        EmbeddingBackend::Hash => Arc::new(local::HashEmbedder::new(config.embeddings.dimensions)),
    };
    tracing::info!("Embedding provider: {}", provider.name());
    Ok(provider)
}

/// Build the configured language model
pub fn llm_from_config(config: &AppConfig) -> Result<Arc<dyn LanguageModel>> {
    let llm: Arc<dyn LanguageModel> = match config.llm.backend {
        LlmBackend::Ollama => Arc::new(ollama::OllamaLlm::new(&config.llm)?),
        LlmBackend::Groq => Arc::new(groq::GroqLlm::new(&config.llm)?),
    };
    tracing::info!("Language model: {} ({})", llm.name(), llm.model());
    Ok(llm)
}
