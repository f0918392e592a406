//! Input safety checks run before a question reaches the router

use once_cell::sync::Lazy;
use regex::RegexSet;

use crate::error::{Error, Result};

/// Terms that block a question when they appear anywhere in it
pub const HARMFUL_TERMS: &[&str] = &["hack", "exploit", "illegal", "suicide", "self-harm"];

pub const HARMFUL_PATTERNS: &[&str] = &[
    r"how to (hack|break|exploit|steal)",
    r"generate (fake|false) (documents|ids|certificates)",
    r"illegal (activities|methods|ways)",
];

static HARMFUL_SET: Lazy<RegexSet> =
    Lazy::new(|| RegexSet::new(HARMFUL_PATTERNS).expect("Invalid regex"));

/// Reject harmful or empty questions with a user-facing message
pub fn validate_safety(question: &str) -> Result<()> {
    let lowered = question.trim().to_lowercase();

    if HARMFUL_TERMS.iter().any(|term| lowered.contains(term)) {
        return Err(Error::input_rejected(
            "I can't help with potentially harmful requests.",
        ));
    }

    if HARMFUL_SET.is_match(&lowered) {
        return Err(Error::input_rejected(
            "I can't assist with potentially harmful requests.",
        ));
    }

    if question.trim().chars().count() < 2 {
        return Err(Error::input_rejected("Please ask a question."));
    }

    Ok(())
}
