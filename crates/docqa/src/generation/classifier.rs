//! Question classification as an ordered rule table
//!
//! Rules are evaluated top to bottom and the first match wins; anything
//! unmatched is a document question.

use once_cell::sync::Lazy;
use regex::RegexSet;

use crate::types::QuestionClassification;

/// Greeting tokens, matched exactly against the lowercased, trimmed question
pub const GREETINGS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
];

/// Patterns referring to earlier dialogue, searched in the lowercased question
pub const CONVERSATION_PATTERNS: &[&str] = &[
    r"what was my (last|previous|second last|first) question",
    r"what did i ask (before|earlier|previously)",
    r"can you repeat",
    r"what did you (say|tell me) (about|before)",
    r"go back to",
    r"earlier you (said|mentioned)",
    r"in our conversation",
    r"you mentioned",
    r"we were talking about",
    r"from our chat",
];

static CONVERSATION_SET: Lazy<RegexSet> =
    Lazy::new(|| RegexSet::new(CONVERSATION_PATTERNS).expect("Invalid regex"));

/// How a rule inspects the question
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Lowercased, trimmed question equals one of the tokens
    Exact(&'static [&'static str]),
    /// Lowercased question contains a match for any pattern
    AnyPattern(&'static RegexSet),
}

impl Matcher {
    fn matches(&self, lowered: &str) -> bool {
        match self {
            Matcher::Exact(tokens) => {
                let trimmed = lowered.trim();
                tokens.iter().any(|t| *t == trimmed)
            }
            Matcher::AnyPattern(set) => set.is_match(lowered),
        }
    }
}

/// One `(predicate, classification)` entry of the table
#[derive(Debug, Clone)]
pub struct ClassificationRule {
    pub matcher: Matcher,
    pub classification: QuestionClassification,
}

/// Deterministic first-match classifier
#[derive(Debug, Clone)]
pub struct QuestionClassifier {
    rules: Vec<ClassificationRule>,
}

impl QuestionClassifier {
    /// Classifier with the built-in greeting and conversation rules
    pub fn new() -> Self {
        Self::with_rules(vec![
            ClassificationRule {
                matcher: Matcher::Exact(GREETINGS),
                classification: QuestionClassification::Greeting,
            },
            ClassificationRule {
                matcher: Matcher::AnyPattern(&CONVERSATION_SET),
                classification: QuestionClassification::ConversationMeta,
            },
        ])
    }

    pub fn with_rules(rules: Vec<ClassificationRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    pub fn classify(&self, question: &str) -> QuestionClassification {
        let lowered = question.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(&lowered))
            .map(|rule| rule.classification)
            .unwrap_or(QuestionClassification::Document)
    }
}

impl Default for QuestionClassifier {
    fn default() -> Self {
        Self::new()
    }
}
