//! PDF text extraction with content-stream and OCR fallbacks

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::config::ExtractionConfig;
use crate::error::{Error, Result};
use crate::types::ExtractionMethod;

use super::ocr::OcrExtractor;

/// Text extracted from an uploaded document
#[derive(Debug, Clone)]
pub struct ExtractedText {
    /// Cleaned text
    pub text: String,
    /// Path that produced the text
    pub method: ExtractionMethod,
    /// Page count when the PDF structure could be read
    pub page_count: Option<u32>,
}

/// PDF extractor: text layer first, OCR when the text layer is unusable
pub struct PdfExtractor {
    config: ExtractionConfig,
    ocr: OcrExtractor,
}

impl PdfExtractor {
    /// Create a new extractor
    pub fn new(config: ExtractionConfig) -> Self {
        let ocr = OcrExtractor::new(&config);
        Self { config, ocr }
    }

    /// Whether the filename names a PDF
    pub fn is_supported(filename: &str) -> bool {
        filename
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("pdf"))
    }

    /// Extract text on a blocking worker
    pub async fn extract(&self, filename: &str, data: Vec<u8>) -> Result<ExtractedText> {
        let config = self.config.clone();
        let filename = filename.to_string();
        tokio::task::spawn_blocking(move || PdfExtractor::new(config).extract_blocking(&filename, &data))
            .await
            .map_err(|e| Error::Internal(format!("Task join error: {}", e)))?
    }

    /// Extract text, trying the text layer then OCR
    pub fn extract_blocking(&self, filename: &str, data: &[u8]) -> Result<ExtractedText> {
        if !Self::is_supported(filename) {
            let ext = filename.rsplit_once('.').map(|(_, e)| e).unwrap_or("");
            return Err(Error::UnsupportedFileType(format!(
                "{} - only PDF documents are accepted",
                ext
            )));
        }
        if !data.starts_with(b"%PDF") {
            return Err(Error::unreadable(format!("{} is not a valid PDF file", filename)));
        }

        tracing::info!("Processing PDF: {}", filename);
        let page_count = count_pages(data);

        match self.extract_text_layer(data) {
            Ok((text, method)) => {
                let text = clean_text(&text);
                if self.is_usable(&text) {
                    tracing::info!(
                        "Standard extraction successful ({}, {} characters)",
                        method.display_name(),
                        text.len()
                    );
                    return Ok(ExtractedText { text, method, page_count });
                }
                tracing::warn!("Standard method yielded minimal text, proceeding to OCR");
            }
            Err(e) => {
                tracing::warn!("Standard method failed ({}), proceeding to OCR", e);
            }
        }

        if !self.config.enable_ocr {
            return Err(Error::unreadable(
                "No readable text layer found and OCR is disabled",
            ));
        }

        match self.ocr.extract(data) {
            Ok(text) => {
                let text = clean_text(&text);
                if self.is_usable(&text) {
                    tracing::info!("OCR extraction successful ({} characters)", text.len());
                    return Ok(ExtractedText {
                        text,
                        method: ExtractionMethod::Ocr,
                        page_count,
                    });
                }
                tracing::warn!("OCR yielded minimal text");
            }
            Err(e) => {
                tracing::warn!("OCR extraction failed: {}", e);
            }
        }

        tracing::error!("Both standard and OCR methods failed for {}", filename);
        Err(Error::unreadable(
            "Both standard and OCR methods failed - no readable text found",
        ))
    }

    /// Extracted text counts only when its trimmed length exceeds the configured minimum
    pub fn is_usable(&self, text: &str) -> bool {
        text.trim().chars().count() > self.config.min_text_chars
    }

    /// Extract the embedded text layer with a timeout to prevent hangs on problematic fonts
    fn extract_text_layer(&self, data: &[u8]) -> Result<(String, ExtractionMethod)> {
        let data_vec = data.to_vec();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = pdf_extract::extract_text_from_mem(&data_vec);
            let _ = tx.send(result);
        });

        let timeout = Duration::from_secs(self.config.pdf_timeout_secs);
        match rx.recv_timeout(timeout) {
            Ok(Ok(text)) if !text.trim().is_empty() => Ok((text, ExtractionMethod::TextLayer)),
            Ok(Ok(_)) => {
                tracing::debug!("pdf-extract returned no text, trying content stream scan");
                extract_content_streams(data).map(|t| (t, ExtractionMethod::ContentStream))
            }
            Ok(Err(e)) => {
                tracing::warn!("pdf-extract failed: {}, trying content stream scan", e);
                extract_content_streams(data).map(|t| (t, ExtractionMethod::ContentStream))
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::error!(
                    "PDF extraction timeout after {:?} - PDF may have complex fonts",
                    timeout
                );
                extract_content_streams(data).map(|t| (t, ExtractionMethod::ContentStream))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                tracing::error!("PDF extraction thread crashed");
                extract_content_streams(data).map(|t| (t, ExtractionMethod::ContentStream))
            }
        }
    }
}

fn count_pages(data: &[u8]) -> Option<u32> {
    lopdf::Document::load_mem(data)
        .ok()
        .map(|doc| doc.get_pages().len() as u32)
}

/// Fallback extraction scanning page content streams with lopdf
fn extract_content_streams(data: &[u8]) -> Result<String> {
    let doc = lopdf::Document::load_mem(data)
        .map_err(|e| Error::unreadable(format!("Failed to load PDF: {}", e)))?;

    let mut pages = Vec::new();
    for (page_num, page_id) in doc.get_pages() {
        match doc.get_page_content(page_id) {
            Ok(content) => {
                let text = text_from_content_stream(&content);
                if !text.trim().is_empty() {
                    pages.push(text);
                }
            }
            Err(e) => {
                tracing::debug!("Could not get content for page {}: {}", page_num, e);
            }
        }
    }

    if pages.is_empty() {
        return Err(Error::unreadable(
            "PDF appears to be image-based or has no extractable text",
        ));
    }

    Ok(pages.join("\n"))
}

/// Collect strings shown by `Tj`/`TJ` operators inside BT/ET blocks
fn text_from_content_stream(content: &[u8]) -> String {
    let content_str = String::from_utf8_lossy(content);
    let mut text = String::new();
    let mut in_text_block = false;
    let mut current_text = String::new();

    for line in content_str.lines() {
        let line = line.trim();

        if line == "BT" {
            in_text_block = true;
            continue;
        }

        if line == "ET" {
            in_text_block = false;
            if !current_text.is_empty() {
                text.push_str(&current_text);
                text.push(' ');
                current_text.clear();
            }
            continue;
        }

        if in_text_block && (line.ends_with("Tj") || line.ends_with("TJ")) {
            if let (Some(start), Some(end)) = (line.find('('), line.rfind(')')) {
                if start < end {
                    let decoded = line[start + 1..end]
                        .replace("\\n", "\n")
                        .replace("\\r", "\r")
                        .replace("\\t", "\t")
                        .replace("\\(", "(")
                        .replace("\\)", ")")
                        .replace("\\\\", "\\");
                    current_text.push_str(&decoded);
                }
            }
        }
    }

    text
}

/// Normalise ligatures and typographic glyphs, drop NULs and blank lines
pub fn clean_text(text: &str) -> String {
    text.replace('\0', "")
        .replace(['\u{2010}', '\u{2011}', '\u{2013}'], "-")
        .replace('\u{2014}', "--")
        .replace(['\u{2018}', '\u{2019}'], "'")
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace('\u{2022}', "* ")
        .replace('\u{2026}', "...")
        .replace('\u{00A0}', " ")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB00}', "ff")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
