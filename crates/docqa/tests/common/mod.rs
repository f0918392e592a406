//! In-process fakes shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

use docqa::config::{AppConfig, EmbeddingBackend};
use docqa::error::{Error, Result};
use docqa::ingestion::TextChunker;
use docqa::providers::local::HashEmbedder;
use docqa::providers::{EmbeddingProvider, LanguageModel};
use docqa::retrieval::DocumentIndex;
use docqa::session::{Assistant, LoadedDocument, Session};
use docqa::types::{DocumentMetadata, ExtractionMethod};

pub const INVOICE_TEXT: &str = "ACME Corp invoice number 1042. The invoice total is $450. \
Payment is due within 30 days of the invoice date. Late payments incur a 2% fee.";

/// Hash embedder that counts single-text calls (one per retrieval)
pub struct CountingEmbedder {
    inner: HashEmbedder,
    pub calls: AtomicUsize,
    fail_queries: bool,
}

impl CountingEmbedder {
    pub fn new() -> Self {
        Self {
            inner: HashEmbedder::new(128),
            calls: AtomicUsize::new(0),
            fail_queries: false,
        }
    }

    /// Indexing works, every query embedding fails
    pub fn failing_queries() -> Self {
        Self {
            fail_queries: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for CountingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_queries {
            return Err(Error::embedding("embedding server unavailable"));
        }
        self.inner.embed(text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.inner.embed_batch(texts).await
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Language model returning a fixed answer and capturing prompts
pub struct ScriptedLlm {
    answer: Mutex<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: Mutex::new(answer.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn set_answer(&self, answer: &str) {
        *self.answer.lock() = answer.to_string();
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }

    pub fn last_prompt(&self) -> String {
        self.prompts.lock().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl LanguageModel for ScriptedLlm {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        Ok(self.answer.lock().clone())
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// Language model whose transport always fails
pub struct UnreachableLlm;

#[async_trait]
impl LanguageModel for UnreachableLlm {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(Error::model_call("connection refused"))
    }

    fn name(&self) -> &str {
        "unreachable"
    }

    fn model(&self) -> &str {
        "unreachable"
    }
}

/// Config with offline embeddings, no OCR and storage under `dir`
pub fn test_config(dir: &TempDir) -> AppConfig {
    let mut config = AppConfig::default();
    config.embeddings.backend = EmbeddingBackend::Hash;
    config.embeddings.dimensions = 128;
    config.chunking.chunk_size = 120;
    config.chunking.chunk_overlap = 20;
    config.extraction.enable_ocr = false;
    config.storage.upload_dir = dir.path().join("uploads");
    config.storage.index_dir = dir.path().join("index");
    config
}

pub struct Harness {
    pub dir: TempDir,
    pub embedder: Arc<CountingEmbedder>,
    pub llm: Arc<ScriptedLlm>,
    pub assistant: Assistant,
}

impl Harness {
    pub fn new(answer: &str) -> Self {
        Self::with_embedder(answer, CountingEmbedder::new())
    }

    pub fn with_embedder(answer: &str, embedder: CountingEmbedder) -> Self {
        let dir = TempDir::new().unwrap();
        let embedder = Arc::new(embedder);
        let llm = Arc::new(ScriptedLlm::new(answer));
        let assistant = Assistant::new(test_config(&dir), embedder.clone(), llm.clone());
        Self {
            dir,
            embedder,
            llm,
            assistant,
        }
    }

    /// Session with `text` indexed as its active document
    pub async fn session_with_text(&self, filename: &str, text: &str) -> Session {
        let mut session = self.assistant.new_session();
        let metadata = DocumentMetadata::new(filename, session.id(), filename, ExtractionMethod::TextLayer);
        let chunker = TextChunker::new(120, 20);
        let index = DocumentIndex::build(text, metadata, &chunker, self.embedder.as_ref())
            .await
            .unwrap()
            .unwrap();
        session.replace_document(LoadedDocument {
            filename: filename.to_string(),
            content_hash: filename.to_string(),
            index: Arc::new(index),
        });
        session
    }
}

/// Minimal single-page PDF showing one text line per entry
pub fn pdf_with_lines(lines: &[&str]) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut operations = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
        operations.push(Operation::new(
            "Td",
            vec![50.into(), (780 - 20 * i as i64).into()],
        ));
        operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        operations.push(Operation::new("ET", vec![]));
    }
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}
