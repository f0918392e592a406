//! docqa HTTP server
//!
//! Run with: cargo run -p docqa --bin docqa-server [config.toml]

use std::path::PathBuf;

use docqa::{
    config::{AppConfig, LlmBackend},
    providers::ollama::OllamaLlm,
    server::DocQaServer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docqa=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                          docqa                            ║
║          Grounded Q&A over a single PDF document          ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("DOCQA_CONFIG").ok())
        .map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - LLM: {:?} / {}", config.llm.backend, config.llm.model);
    tracing::info!("  - Embeddings: {:?} / {}", config.embeddings.backend, config.embeddings.model);
    tracing::info!(
        "  - Chunking: {} chars, {} overlap",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );

    if config.llm.backend == LlmBackend::Ollama {
        tracing::info!("Checking Ollama at {}...", config.llm.base_url);
        if OllamaLlm::new(&config.llm)?.health_check().await {
            tracing::info!("Ollama is running");
        } else {
            tracing::warn!("Ollama not available at {}", config.llm.base_url);
            tracing::warn!("  Start it with: ollama serve");
            tracing::warn!(
                "  Pull models: ollama pull {} && ollama pull {}",
                config.embeddings.model,
                config.llm.model
            );
        }
    }

    let server = DocQaServer::new(config).await?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
