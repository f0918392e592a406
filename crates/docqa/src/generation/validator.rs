//! Output validation: grounding checks and answer normalization

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::types::{QuestionClassification, RetrievedPassage};

/// Answer used when nothing relevant was retrieved
pub const NOT_FOUND_MESSAGE: &str = "I cannot find this information in the uploaded document.";

/// Answer substituted for an ungrounded model answer
pub const REFUSAL_MESSAGE: &str = "I can only answer questions based on the content of the uploaded document. Please ask something related to the uploaded file.";

/// Phrases marking an answer drawn from general knowledge (matched case-insensitively)
pub const GENERAL_KNOWLEDGE_INDICATORS: &[&str] = &[
    "based on my general knowledge",
    "as an ai language model",
    "in general,",
    "typically,",
    "usually,",
    "commonly,",
    "is a programming language",
    "is defined as",
    "refers to the",
    "in computer science",
];

/// Hedging lead-ins removed during normalization
pub const HEDGING_PHRASES: &[&str] = &[
    "I might be wrong, ",
    "I could be mistaken, ",
    "Based on my training, ",
    "As an AI, ",
    "According to my knowledge, ",
    "From what I understand, ",
];

/// Word budget for a normalized answer
pub const MAX_ANSWER_WORDS: usize = 150;

/// Only the leading passages take part in the overlap check
const OVERLAP_PASSAGES: usize = 2;
const OVERLAP_MIN_ANSWER_WORDS: usize = 10;
const OVERLAP_MIN_SHARED_WORDS: usize = 2;

static HEDGING_REGEX: Lazy<Regex> = Lazy::new(|| {
    let alternatives = HEDGING_PHRASES
        .iter()
        .map(|phrase| {
            phrase
                .trim_end()
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)(?:{})\s+", alternatives)).expect("Invalid regex")
});

/// Why an answer was replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// Document question with nothing retrieved
    NoPassages,
    /// Answer contains a general-knowledge phrase
    GeneralKnowledge(&'static str),
    /// Answer shares too few words with the leading passages
    LowOverlap { answer_words: usize, shared: usize },
}

/// Outcome of validating one answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub accepted: bool,
    /// Normalized answer when accepted, the fixed substitute otherwise
    pub answer: String,
    pub reason: Option<RejectionReason>,
}

impl Validation {
    fn accept(answer: &str) -> Self {
        Self {
            accepted: true,
            answer: normalize(answer),
            reason: None,
        }
    }

    fn reject(reason: RejectionReason) -> Self {
        let answer = match reason {
            RejectionReason::NoPassages => NOT_FOUND_MESSAGE,
            _ => REFUSAL_MESSAGE,
        };
        Self {
            accepted: false,
            answer: answer.to_string(),
            reason: Some(reason),
        }
    }
}

/// Grounding validator for model answers
#[derive(Debug, Clone, Default)]
pub struct OutputValidator;

impl OutputValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(
        &self,
        answer: &str,
        passages: &[RetrievedPassage],
        classification: QuestionClassification,
    ) -> Validation {
        if classification != QuestionClassification::Document {
            return Validation::accept(answer);
        }

        if passages.is_empty() {
            return Validation::reject(RejectionReason::NoPassages);
        }

        let answer_lower = answer.trim().to_lowercase();

        if let Some(indicator) = GENERAL_KNOWLEDGE_INDICATORS
            .iter()
            .find(|indicator| answer_lower.contains(*indicator))
        {
            tracing::debug!("Answer rejected, general knowledge phrase: {:?}", indicator);
            return Validation::reject(RejectionReason::GeneralKnowledge(*indicator));
        }

        let source_text = passages
            .iter()
            .take(OVERLAP_PASSAGES)
            .map(|p| p.content.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");
        let answer_words: HashSet<&str> = answer_lower.split_whitespace().collect();
        let source_words: HashSet<&str> = source_text.split_whitespace().collect();
        let shared = answer_words.intersection(&source_words).count();

        if answer_words.len() > OVERLAP_MIN_ANSWER_WORDS && shared < OVERLAP_MIN_SHARED_WORDS {
            tracing::debug!(
                "Answer rejected, {} words with {} shared",
                answer_words.len(),
                shared
            );
            return Validation::reject(RejectionReason::LowOverlap {
                answer_words: answer_words.len(),
                shared,
            });
        }

        Validation::accept(answer)
    }
}

/// Strip hedging, capitalize, cap the word count and terminate the sentence
///
/// Idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(answer: &str) -> String {
    // Capitalizing can expose a hedge (`ı might be wrong, ` -> `I might be wrong, `),
    // so strip and capitalize until neither changes the text.
    let mut out = answer.to_string();
    loop {
        let stripped = HEDGING_REGEX.replace_all(&out, "");
        let next = capitalize_first(stripped.trim());
        if next == out {
            break;
        }
        out = next;
    }

    if out.split_whitespace().count() > MAX_ANSWER_WORDS {
        out = out
            .split_whitespace()
            .take(MAX_ANSWER_WORDS)
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str("...");
    }

    if let Some(last) = out.chars().last() {
        if !matches!(last, '.' | '!' | '?') {
            out.push('.');
        }
    }

    out
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() && !first.is_uppercase() => {
            first.to_uppercase().chain(chars).collect()
        }
        _ => text.to_string(),
    }
}
