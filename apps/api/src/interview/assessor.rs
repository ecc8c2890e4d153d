//! Assessor — the Evaluator, Summarizer and Clarifier collaborators.
//!
//! All three are prompts over the same `LanguageModel::ask` primitive. Failures are returned,
//! not hidden: the engine picks the fallback text at each call site.

use std::sync::Arc;

use crate::interview::prompts::{
    CLARIFICATION_PROMPT_TEMPLATE, EVALUATION_PROMPT_TEMPLATE, SUMMARY_PROMPT_TEMPLATE,
};
use crate::interview::session::AnswerRecord;
use crate::llm_client::{LanguageModel, LlmError};

#[derive(Clone)]
pub struct Assessor {
    llm: Arc<dyn LanguageModel>,
}

impl Assessor {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    /// Scores one answer against its question.
    pub async fn evaluate(&self, question: &str, answer: &str) -> Result<String, LlmError> {
        self.llm.ask(&build_evaluation_prompt(question, answer)).await
    }

    /// Overall feedback across every evaluated answer.
    pub async fn summarize(&self, answers: &[AnswerRecord]) -> Result<String, LlmError> {
        self.llm.ask(&build_summary_prompt(answers)).await
    }

    /// A hint or rephrasing of the question that does not give the answer away.
    pub async fn clarify(&self, question: &str) -> Result<String, LlmError> {
        self.llm
            .ask(&CLARIFICATION_PROMPT_TEMPLATE.replace("{question}", question))
            .await
    }
}

fn build_evaluation_prompt(question: &str, answer: &str) -> String {
    EVALUATION_PROMPT_TEMPLATE
        .replace("{question}", question)
        .replace("{answer}", answer)
}

fn build_summary_prompt(answers: &[AnswerRecord]) -> String {
    let transcript = answers
        .iter()
        .map(|a| {
            format!(
                "Q: {}\nA: {}\nEval: {}",
                a.question, a.answer, a.evaluation
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    SUMMARY_PROMPT_TEMPLATE.replace("{transcript}", &transcript)
}
