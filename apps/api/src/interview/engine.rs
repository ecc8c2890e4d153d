//! Interview Engine — the per-session stage machine.
//!
//! intro → warm-up → technical interview (with clarification) → summary.
//!
//! Each message loads the session, advances it one step, and saves it back. The store lock is
//! never held across a model call, so different sessions proceed in parallel. Two messages for
//! the same session at the same time are not guarded against. A reset that lands while a
//! message is in flight wins: the in-flight step is discarded rather than saved.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::interview::assessor::Assessor;
use crate::interview::prompts::{
    APOLOGY, CLARIFICATION_LEAD_IN, EVALUATION_FALLBACK, FILLER_NUDGE, GREETING,
    INTERVIEW_COMPLETED, INTERVIEW_TRANSITION, REPHRASE_LEAD_IN, SUMMARY_FALLBACK,
};
use crate::interview::script::{normalize, InterviewScript};
use crate::interview::session::{AnswerRecord, Completion, Session, Stage, WarmupEntry};
use crate::interview::store::SessionStore;
use crate::transcript::CompletedInterview;

/// Internal inconsistencies. Never shown to the candidate; they become the apology reply.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("no {list} question at index {index}")]
    QuestionOutOfRange { list: &'static str, index: usize },
}

pub struct InterviewEngine {
    script: Arc<InterviewScript>,
    store: Arc<dyn SessionStore>,
    assessor: Assessor,
    completions: mpsc::UnboundedSender<CompletedInterview>,
}

impl InterviewEngine {
    pub fn new(
        script: Arc<InterviewScript>,
        store: Arc<dyn SessionStore>,
        assessor: Assessor,
        completions: mpsc::UnboundedSender<CompletedInterview>,
    ) -> Self {
        Self {
            script,
            store,
            assessor,
            completions,
        }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Routes one candidate message through the session's current stage and returns the reply.
    ///
    /// Always returns text. Collaborator failures degrade to fixed fallbacks; internal errors
    /// produce the apology reply and leave the stored session untouched.
    pub async fn handle_message(&self, session_id: &str, message: &str) -> String {
        let mut session = self.store.get_or_create(session_id).await;

        match self.advance(session_id, &mut session, message).await {
            Ok(reply) => {
                if !self.store.save(session_id, session).await {
                    info!(session_id, "Session was reset mid-message; step discarded");
                }
                reply
            }
            Err(e) => {
                error!(session_id, "Interview step failed: {e}");
                APOLOGY.to_string()
            }
        }
    }

    async fn advance(
        &self,
        session_id: &str,
        session: &mut Session,
        message: &str,
    ) -> Result<String, EngineError> {
        match session.stage {
            Stage::Intro => {
                let first = self.warmup_question(0)?;
                session.stage = Stage::Warmup { index: 0 };
                Ok(format!("{GREETING}\n\n{first}"))
            }

            Stage::Warmup { index } => {
                let question = self.warmup_question(index)?;
                session.warmup_log.push(WarmupEntry {
                    question: question.to_string(),
                    answer: message.to_string(),
                });

                let next = index + 1;
                if let Some(next_question) = self.script.warmup_question(next) {
                    session.stage = Stage::Warmup { index: next };
                    return Ok(next_question.to_string());
                }

                let first = self.technical_question(0)?;
                session.stage = Stage::Interviewing { index: 0 };
                Ok(format!("{INTERVIEW_TRANSITION}\n\n{first}"))
            }

            Stage::Interviewing { index } => {
                if self.script.signals_confusion(&normalize(message)) {
                    session.stage = Stage::Clarifying { index };
                    return self.clarify(session_id, index).await;
                }
                self.record_answer(session_id, session, index, message).await
            }

            Stage::Clarifying { index } => {
                if self.script.is_filler(&normalize(message)) {
                    return Ok(FILLER_NUDGE.to_string());
                }
                self.record_answer(session_id, session, index, message).await
            }

            Stage::Summary => Ok(INTERVIEW_COMPLETED.to_string()),
        }
    }

    /// Re-explains the current question without advancing or logging anything.
    async fn clarify(&self, session_id: &str, index: usize) -> Result<String, EngineError> {
        let question = self.technical_question(index)?;
        match self.assessor.clarify(question).await {
            Ok(hint) => Ok(format!("{CLARIFICATION_LEAD_IN}\n\n{hint}")),
            Err(e) => {
                warn!(session_id, "Clarification failed: {e}");
                Ok(format!("{REPHRASE_LEAD_IN} {question}"))
            }
        }
    }

    /// Evaluates the answer, logs it, then moves to the next question or to the summary.
    async fn record_answer(
        &self,
        session_id: &str,
        session: &mut Session,
        index: usize,
        answer: &str,
    ) -> Result<String, EngineError> {
        let question = self.technical_question(index)?;

        let evaluation = match self.assessor.evaluate(question, answer).await {
            Ok(evaluation) => evaluation,
            Err(e) => {
                warn!(session_id, question_index = index, "Evaluation failed: {e}");
                EVALUATION_FALLBACK.to_string()
            }
        };

        session.answer_log.push(AnswerRecord {
            question: question.to_string(),
            answer: answer.to_string(),
            evaluation,
        });

        let next = index + 1;
        if let Some(next_question) = self.script.technical_question(next) {
            session.stage = Stage::Interviewing { index: next };
            return Ok(next_question.to_string());
        }

        session.stage = Stage::Summary;
        let summary = match self.assessor.summarize(&session.answer_log).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(session_id, "Summary generation failed: {e}");
                SUMMARY_FALLBACK.to_string()
            }
        };
        session.completion = Some(Completion {
            summary: summary.clone(),
            completed_at: Utc::now(),
        });
        info!(session_id, answers = session.answer_log.len(), "Interview completed");

        self.emit_completion(session_id, session);
        Ok(summary)
    }

    fn emit_completion(&self, session_id: &str, session: &Session) {
        let Some(event) = CompletedInterview::from_session(session_id, session) else {
            return;
        };
        if self.completions.send(event).is_err() {
            warn!(session_id, "Transcript worker is not running; transcript dropped");
        }
    }

    fn warmup_question(&self, index: usize) -> Result<&str, EngineError> {
        self.script
            .warmup_question(index)
            .ok_or(EngineError::QuestionOutOfRange {
                list: "warm-up",
                index,
            })
    }

    fn technical_question(&self, index: usize) -> Result<&str, EngineError> {
        self.script
            .technical_question(index)
            .ok_or(EngineError::QuestionOutOfRange {
                list: "technical",
                index,
            })
    }
}
