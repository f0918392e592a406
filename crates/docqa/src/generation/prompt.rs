//! Prompt templates for grounded question answering

use crate::types::{QuestionClassification, RetrievedPassage};

/// Context placeholder for greetings
pub const GREETING_CONTEXT: &str = "No document context needed for greeting";

/// Context placeholder for questions about the conversation itself
pub const CONVERSATION_CONTEXT: &str =
    "Use conversation history to answer this question about our chat";

/// Prompt builder for routed questions
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join passage texts, most relevant first
    pub fn build_context(passages: &[RetrievedPassage]) -> String {
        passages
            .iter()
            .map(|p| p.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Context block for a question class; document questions use the passages
    pub fn context_for(classification: QuestionClassification, passages: &[RetrievedPassage]) -> String {
        match classification {
            QuestionClassification::Greeting => GREETING_CONTEXT.to_string(),
            QuestionClassification::ConversationMeta => CONVERSATION_CONTEXT.to_string(),
            QuestionClassification::Document => Self::build_context(passages),
        }
    }

    /// Build the full single-turn prompt
    pub fn build(history_lines: &[String], context: &str, question: &str) -> String {
        format!(
            r#"You are a helpful document analysis assistant. You can handle greetings, conversation history questions, and answer questions about the uploaded document.

INSTRUCTIONS:
1. For greetings (hi, hello, hey, etc.): Respond warmly and mention you can help with the document
2. For conversation history questions (what was my last question, what did you say before, etc.): Use ONLY the conversation history to answer
3. For document questions: Answer based ONLY on the provided context
4. If the answer is not in the context, say "I cannot find this information in the uploaded document."
5. Do NOT use general knowledge for document questions
6. Keep answers concise and clear
7. Use conversation history to maintain context and answer meta-questions about our chat

Previous conversation:
{history}

Document context (if relevant):
{context}

Current question: {question}

Response:"#,
            history = history_lines.join("\n"),
            context = context,
            question = question
        )
    }
}
