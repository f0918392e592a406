//! Application state for the HTTP shell

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::Result;
use crate::session::{Assistant, SessionManager};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: AppConfig,
    /// Answering engine shared by all sessions
    assistant: Assistant,
    /// Live sessions
    sessions: SessionManager,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create state with the providers selected in `config`
    pub async fn new(config: AppConfig) -> Result<Self> {
        tracing::info!(
            "Initializing application state (llm: {:?}, embeddings: {:?})",
            config.llm.backend,
            config.embeddings.backend
        );
        let assistant = Assistant::from_config(config.clone())?;
        Self::with_assistant(assistant)
    }

    /// Create state around an existing assistant
    pub fn with_assistant(assistant: Assistant) -> Result<Self> {
        let config = assistant.config().clone();

        std::fs::create_dir_all(&config.storage.upload_dir)?;
        std::fs::create_dir_all(&config.storage.index_dir)?;
        tracing::info!(
            "Storage ready (uploads: {}, index: {})",
            config.storage.upload_dir.display(),
            config.storage.index_dir.display()
        );

        let sessions = SessionManager::new(config.memory.window_turns);
        let state = Self {
            inner: Arc::new(AppStateInner {
                config,
                assistant,
                sessions,
                ready: RwLock::new(false),
            }),
        };
        state.set_ready(true);
        Ok(state)
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn assistant(&self) -> &Assistant {
        &self.inner.assistant
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.inner.sessions
    }

    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
