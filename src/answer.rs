//! Answer generation from retrieved context.

use crate::errors::Error;

/// Turns a question and ranked context into an answer.
///
/// The context is the retrieval output, verbatim and in rank order.
pub trait AnswerGenerator: Send + Sync {
    fn generate(&self, question: &str, context: &[String]) -> Result<String, Error>;
}

/// Deterministic answerer that echoes the remembered context.
#[derive(Debug, Clone, Default)]
pub struct TemplateAnswerer;

impl AnswerGenerator for TemplateAnswerer {
    fn generate(&self, question: &str, context: &[String]) -> Result<String, Error> {
        if context.is_empty() {
            return Ok(format!(
                "You asked: '{question}'\nBut I don't have any memories yet."
            ));
        }

        let mut answer = format!("You asked: '{question}'\nI remember these things about you:");
        for memory in context {
            answer.push_str("\n- ");
            answer.push_str(memory);
        }
        answer.push_str("\nSo my guess is based on that memory.");
        Ok(answer)
    }
}
