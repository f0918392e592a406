//! OCR fallback for image-only PDFs (pdftoppm + tesseract)

use std::fs;
use std::process::Command;

use crate::config::ExtractionConfig;
use crate::error::{Error, Result};

/// OCR extractor driving poppler's `pdftoppm` and `tesseract`
pub struct OcrExtractor {
    language: String,
    dpi: u32,
}

impl OcrExtractor {
    /// Create a new OCR extractor
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            language: config.ocr_language.clone(),
            dpi: config.ocr_dpi,
        }
    }

    /// Check if both tools are installed
    pub fn is_available() -> bool {
        Self::has_pdftoppm() && Self::has_tesseract()
    }

    /// Check if tesseract OCR is available
    pub fn has_tesseract() -> bool {
        Command::new("tesseract")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Check if pdftoppm (poppler-utils) is available
    pub fn has_pdftoppm() -> bool {
        Command::new("pdftoppm")
            .arg("-v")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Rasterise every page and read it back with tesseract
    pub fn extract(&self, data: &[u8]) -> Result<String> {
        if !Self::is_available() {
            return Err(Error::unreadable(
                "OCR requires pdftoppm and tesseract. Install with: apt install poppler-utils tesseract-ocr",
            ));
        }

        let temp_dir = tempfile::Builder::new().prefix("docqa-ocr-").tempdir()?;
        let pdf_path = temp_dir.path().join("input.pdf");
        fs::write(&pdf_path, data)?;

        tracing::info!("Converting PDF pages to images at {} DPI", self.dpi);
        let pdftoppm_output = Command::new("pdftoppm")
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(&pdf_path)
            .arg(temp_dir.path().join("page"))
            .output()
            .map_err(|e| Error::unreadable(format!("pdftoppm failed: {}", e)))?;

        if !pdftoppm_output.status.success() {
            let stderr = String::from_utf8_lossy(&pdftoppm_output.stderr);
            return Err(Error::unreadable(format!("pdftoppm error: {}", stderr)));
        }

        // Find all generated page images
        let mut page_images: Vec<_> = fs::read_dir(temp_dir.path())?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "png"))
            .collect();
        page_images.sort();

        if page_images.is_empty() {
            return Err(Error::unreadable("pdftoppm produced no images"));
        }

        let mut pages = Vec::new();
        for (i, image_path) in page_images.iter().enumerate() {
            tracing::debug!("Processing page {}/{} with OCR", i + 1, page_images.len());

            let ocr_output = Command::new("tesseract")
                .arg(image_path)
                .arg("stdout")
                .arg("-l")
                .arg(&self.language)
                .output()
                .map_err(|e| Error::unreadable(format!("tesseract failed on page {}: {}", i + 1, e)))?;

            if !ocr_output.status.success() {
                tracing::warn!("tesseract failed on page {}", i + 1);
                continue;
            }

            let page_text = String::from_utf8_lossy(&ocr_output.stdout);
            if page_text.trim().is_empty() {
                tracing::debug!("Page {}: no text detected", i + 1);
            } else {
                pages.push(page_text.into_owned());
            }
        }

        tracing::info!(
            "OCR results: {}/{} pages had readable text",
            pages.len(),
            page_images.len()
        );

        let text = pages.join("\n");
        if text.trim().is_empty() {
            return Err(Error::unreadable(
                "No text detected in any page - document may contain only images",
            ));
        }

        Ok(text)
    }
}
