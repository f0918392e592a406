//! Document ingestion: PDF text extraction and chunking

mod chunker;
mod ocr;
mod parser;

pub use chunker::TextChunker;
pub use ocr::OcrExtractor;
pub use parser::{clean_text, ExtractedText, PdfExtractor};
