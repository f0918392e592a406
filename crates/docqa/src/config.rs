//! Configuration for the document Q&A system

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Language model configuration
    pub llm: LlmConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Conversation memory configuration
    pub memory: MemoryConfig,
    /// Text extraction configuration
    pub extraction: ExtractionConfig,
    /// On-disk storage locations
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from an optional TOML file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                toml::from_str(&raw).map_err(|e| {
                    Error::Config(format!("Invalid config file {}: {}", path.display(), e))
                })?
            }
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using the supplied lookup
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GROQ_API_KEY").filter(|k| !k.is_empty()) {
            self.llm.api_key = Some(key);
        }
        if let Some(backend) = lookup("DOCQA_LLM_BACKEND") {
            self.llm.backend = match backend.to_lowercase().as_str() {
                "ollama" => LlmBackend::Ollama,
                "groq" => LlmBackend::Groq,
                other => {
                    return Err(Error::Config(format!("Unknown LLM backend: {}", other)));
                }
            };
        }
        if let Some(model) = lookup("MODEL_NAME") {
            self.llm.model = model;
        }
        if let Some(model) = lookup("EMBEDDING_MODEL") {
            self.embeddings.model = model;
        }
        if let Some(size) = lookup("MAX_CHUNK_SIZE") {
            self.chunking.chunk_size = parse_env("MAX_CHUNK_SIZE", &size)?;
        }
        if let Some(overlap) = lookup("CHUNK_OVERLAP") {
            self.chunking.chunk_overlap = parse_env("CHUNK_OVERLAP", &overlap)?;
        }
        if let Some(dir) = lookup("PERSIST_DIR") {
            self.storage.index_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("UPLOAD_DIR") {
            self.storage.upload_dir = PathBuf::from(dir);
        }
        if let Some(host) = lookup("DOCQA_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("DOCQA_PORT") {
            self.server.port = parse_env("DOCQA_PORT", &port)?;
        }
        Ok(())
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be greater than 0".to_string()));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.retrieval.top_k == 0 || self.retrieval.top_k > MAX_TOP_K {
            return Err(Error::Config(format!(
                "top_k must be between 1 and {}, got {}",
                MAX_TOP_K, self.retrieval.top_k
            )));
        }
        if self.memory.window_turns == 0 {
            return Err(Error::Config("window_turns must be greater than 0".to_string()));
        }
        if self.llm.backend == LlmBackend::Groq && self.llm.api_key.is_none() {
            return Err(Error::Config(
                "Groq backend selected but GROQ_API_KEY is not set".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {:?}", key, value)))
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 50 * 1024 * 1024,
        }
    }
}

/// Language model backend
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    /// Local Ollama server
    #[default]
    Ollama,
    /// Groq OpenAI-compatible API
    Groq,
}

/// Language model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Backend provider
    pub backend: LlmBackend,
    /// Base URL (Ollama server, or Groq API root)
    pub base_url: String,
    /// Generation model name
    pub model: String,
    /// API key (Groq only)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Temperature for generation, kept low for near-deterministic answers
    pub temperature: f32,
    /// Response length cap in tokens
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: LlmBackend::Ollama,
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2:3b".to_string(),
            api_key: None,
            temperature: 0.1,
            max_tokens: 500,
            timeout_secs: 120,
        }
    }
}

impl LlmConfig {
    /// Base URL to use when the configured one is the Ollama default but Groq is selected
    pub fn effective_base_url(&self) -> &str {
        match self.backend {
            LlmBackend::Groq if self.base_url == LlmConfig::default().base_url => {
                "https://api.groq.com/openai/v1"
            }
            _ => &self.base_url,
        }
    }
}

/// Embedding backend
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Ollama embeddings endpoint
    #[default]
    Ollama,
    /// Offline feature-hashing embedder
    Hash,
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Backend provider
    pub backend: EmbeddingBackend,
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub model: String,
    /// Embedding dimensions (768 for nomic-embed-text)
    pub dimensions: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed embedding requests
    pub max_retries: u32,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Ollama,
            base_url: "http://localhost:11434".to_string(),
            model: "nomic-embed-text".to_string(),
            dimensions: 768,
            timeout_secs: 60,
            max_retries: 2,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Most passages a document question may put into the prompt
pub const MAX_TOP_K: usize = 4;

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of passages retrieved per document question (1..=4)
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 4 }
    }
}

/// Conversation memory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Number of question/answer turns retained per session
    pub window_turns: usize,
    /// Number of formatted history lines embedded in each prompt
    pub prompt_history_lines: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            window_turns: 10,
            prompt_history_lines: 10,
        }
    }
}

/// Text extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Fall back to OCR (pdftoppm + tesseract) when the text layer is unusable
    pub enable_ocr: bool,
    /// Extracted text must be longer than this (trimmed) to count as usable
    pub min_text_chars: usize,
    /// Tesseract language
    pub ocr_language: String,
    /// Rasterisation resolution for OCR
    pub ocr_dpi: u32,
    /// Timeout for the primary PDF text extraction in seconds
    pub pdf_timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            enable_ocr: true,
            min_text_chars: 10,
            ocr_language: "eng".to_string(),
            ocr_dpi: 150,
            pdf_timeout_secs: 60,
        }
    }
}

/// On-disk storage locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for uploaded files
    pub upload_dir: PathBuf,
    /// Directory for per-session index snapshots
    pub index_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let base = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("docqa");

        Self {
            upload_dir: base.join("uploads"),
            index_dir: base.join("index"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.retrieval.top_k, 4);
        assert_eq!(config.memory.window_turns, 10);
        assert_eq!(config.llm.max_tokens, 500);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_env_overrides(lookup(&[
                ("MODEL_NAME", "llama-3.1-8b-instant"),
                ("MAX_CHUNK_SIZE", "800"),
                ("CHUNK_OVERLAP", "100"),
                ("PERSIST_DIR", "/tmp/idx"),
                ("GROQ_API_KEY", "gsk_test"),
                ("DOCQA_LLM_BACKEND", "groq"),
            ]))
            .unwrap();

        assert_eq!(config.llm.model, "llama-3.1-8b-instant");
        assert_eq!(config.chunking.chunk_size, 800);
        assert_eq!(config.chunking.chunk_overlap, 100);
        assert_eq!(config.storage.index_dir, PathBuf::from("/tmp/idx"));
        assert_eq!(config.llm.backend, LlmBackend::Groq);
        assert_eq!(config.llm.effective_base_url(), "https://api.groq.com/openai/v1");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_env_value() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env_overrides(lookup(&[("MAX_CHUNK_SIZE", "lots")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_validate_overlap() {
        let mut config = AppConfig::default();
        config.chunking.chunk_overlap = config.chunking.chunk_size;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_top_k_range() {
        let mut config = AppConfig::default();
        config.retrieval.top_k = 0;
        assert!(config.validate().is_err());
        config.retrieval.top_k = MAX_TOP_K + 2;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
        config.retrieval.top_k = MAX_TOP_K;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_groq_requires_key() {
        let mut config = AppConfig::default();
        config.llm.backend = LlmBackend::Groq;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [retrieval]
            top_k = 3

            [llm]
            model = "phi3"
            "#,
        )
        .unwrap();
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.llm.model, "phi3");
        assert_eq!(config.chunking.chunk_size, 1000);
    }
}
