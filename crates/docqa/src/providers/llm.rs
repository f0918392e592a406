//! Language model trait for single-turn completions

use async_trait::async_trait;
use crate::error::Result;

/// Trait for single-prompt, non-streaming completion
///
/// Transport, auth and timeout failures come back as `Error::ModelCall`,
/// never as a crafted answer string.
///
/// Implementations:
/// - `OllamaLlm`: Local Ollama server
/// - `GroqLlm`: Groq OpenAI-compatible API
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete a single prompt
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
