//! Question router: classify, retrieve when needed, prompt, generate

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::memory::ConversationMemory;
use crate::providers::LanguageModel;
use crate::retrieval::Retriever;
use crate::types::{AnswerResult, RetrievedPassage};

use super::classifier::QuestionClassifier;
use super::prompt::PromptBuilder;
use super::validator::NOT_FOUND_MESSAGE;

/// Routes one question to an answer
///
/// The router never writes to memory; the caller records the final,
/// validated answer once per turn.
pub struct QuestionRouter {
    classifier: QuestionClassifier,
    llm: Arc<dyn LanguageModel>,
    top_k: usize,
    history_lines: usize,
}

impl QuestionRouter {
    pub fn new(llm: Arc<dyn LanguageModel>, top_k: usize, history_lines: usize) -> Self {
        Self {
            classifier: QuestionClassifier::new(),
            llm,
            top_k,
            history_lines,
        }
    }

    pub fn classifier(&self) -> &QuestionClassifier {
        &self.classifier
    }

    pub async fn route(
        &self,
        question: &str,
        memory: &ConversationMemory,
        retriever: &dyn Retriever,
    ) -> Result<AnswerResult> {
        let classification = self.classifier.classify(question);
        tracing::debug!("Question classified as {}", classification);

        let passages = if classification.needs_retrieval() {
            let mut passages = match retriever.get(question).await {
                Ok(passages) => passages,
                Err(e) => {
                    tracing::warn!("Retrieval failed, treating as no match: {}", e);
                    Vec::new()
                }
            };
            passages.truncate(self.top_k);

            if passages.is_empty() {
                tracing::info!("No passages retrieved, skipping generation");
                return Ok(AnswerResult {
                    answer: NOT_FOUND_MESSAGE.to_string(),
                    classification,
                    passages,
                    model_invoked: false,
                });
            }
            passages
        } else {
            Vec::<RetrievedPassage>::new()
        };

        let history = memory.recent_lines(self.history_lines);
        let context = PromptBuilder::context_for(classification, &passages);
        let prompt = PromptBuilder::build(&history, &context, question);
        tracing::debug!(
            "Prompt built: {} chars, {} passages, {} history lines",
            prompt.len(),
            passages.len(),
            history.len()
        );

        match self.llm.complete(&prompt).await {
            Ok(answer) => Ok(AnswerResult {
                answer,
                classification,
                passages,
                model_invoked: true,
            }),
            Err(Error::ModelCall(msg)) => {
                tracing::error!("Model call failed: {}", msg);
                Err(Error::ModelCall(msg))
            }
            Err(e) => {
                tracing::error!("Model call failed: {}", e);
                Err(Error::model_call(e.to_string()))
            }
        }
    }
}
