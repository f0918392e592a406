//! Text chunking into overlapping windows

use unicode_segmentation::UnicodeSegmentation;

/// Text chunker with configurable size and overlap
pub struct TextChunker {
    /// Maximum chunk size in characters
    chunk_size: usize,
    /// Characters carried from the end of one chunk into the next
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size - 1),
        }
    }

    /// Split text into overlapping windows, each at most `chunk_size` characters
    pub fn split(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_chars = 0usize;

        for segment in self.segments(text) {
            let segment_chars = char_len(segment);
            if !current.is_empty() && current_chars + segment_chars > self.chunk_size {
                push_chunk(&mut chunks, &current);

                // Start new chunk with overlap
                current = self.get_overlap_text(&current);
                current_chars = char_len(&current);
                if current_chars + segment_chars > self.chunk_size {
                    current.clear();
                    current_chars = 0;
                }
            }

            current.push_str(segment);
            current_chars += segment_chars;
        }

        push_chunk(&mut chunks, &current);
        chunks
    }

    /// Sentence-sized segments, none longer than `chunk_size`
    fn segments<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut out = Vec::new();
        for sentence in text.split_sentence_bounds() {
            if char_len(sentence) <= self.chunk_size {
                out.push(sentence);
            } else {
                self.split_oversized(sentence, &mut out);
            }
        }
        out
    }

    /// Break a long sentence on word boundaries, hard-splitting words that alone exceed the limit
    fn split_oversized<'a>(&self, sentence: &'a str, out: &mut Vec<&'a str>) {
        let mut start = 0usize;
        let mut pending_chars = 0usize;

        for (idx, word) in sentence.split_word_bound_indices() {
            let word_chars = char_len(word);

            if pending_chars + word_chars > self.chunk_size && idx > start {
                out.push(&sentence[start..idx]);
                start = idx;
                pending_chars = 0;
            }

            if word_chars > self.chunk_size {
                hard_split(word, self.chunk_size, out);
                start = idx + word.len();
                pending_chars = 0;
            } else {
                pending_chars += word_chars;
            }
        }

        if start < sentence.len() {
            out.push(&sentence[start..]);
        }
    }

    /// Get overlap text from the end of a chunk
    fn get_overlap_text(&self, text: &str) -> String {
        if self.overlap == 0 {
            return String::new();
        }
        let total = char_len(text);
        if total <= self.overlap {
            return text.to_string();
        }

        let start = text
            .char_indices()
            .nth(total - self.overlap)
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        let overlap_text = &text[start..];

        // Try to start at a sentence boundary
        if let Some(pos) = overlap_text.find(". ") {
            return overlap_text[pos + 2..].to_string();
        }

        // Fall back to word boundary
        if let Some(pos) = overlap_text.find(' ') {
            return overlap_text[pos + 1..].to_string();
        }

        overlap_text.to_string()
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn push_chunk(chunks: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

fn hard_split<'a>(text: &'a str, size: usize, out: &mut Vec<&'a str>) {
    let mut start = 0usize;
    for (count, (idx, _)) in text.char_indices().enumerate() {
        if count > 0 && count % size == 0 {
            out.push(&text[start..idx]);
            start = idx;
        }
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
}
