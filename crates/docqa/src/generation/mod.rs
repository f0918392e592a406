//! Question routing, prompt assembly and answer validation

pub mod classifier;
pub mod guardrail;
pub mod prompt;
pub mod router;
pub mod validator;

pub use classifier::QuestionClassifier;
pub use guardrail::validate_safety;
pub use prompt::PromptBuilder;
pub use router::QuestionRouter;
pub use validator::{normalize, OutputValidator, Validation, NOT_FOUND_MESSAGE, REFUSAL_MESSAGE};
