//! Per-session conversation state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a session is in the interview. Indices point into the script's question lists.
///
/// Clarification is its own variant so it can only exist during the technical interview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Intro,
    Warmup {
        index: usize,
    },
    Interviewing {
        index: usize,
    },
    Clarifying {
        index: usize,
    },
    Summary,
}

/// Coarse phase of a stage. Ordered so that a session may only ever move to a greater phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Intro,
    Warmup,
    Interview,
    Summary,
}

impl Stage {
    pub fn phase(&self) -> Phase {
        match self {
            Stage::Intro => Phase::Intro,
            Stage::Warmup { .. } => Phase::Warmup,
            Stage::Interviewing { .. } | Stage::Clarifying { .. } => Phase::Interview,
            Stage::Summary => Phase::Summary,
        }
    }
}

/// A warm-up question and the candidate's literal reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarmupEntry {
    pub question: String,
    pub answer: String,
}

/// A technical question, the candidate's literal answer, and the model's evaluation of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question: String,
    pub answer: String,
    pub evaluation: String,
}

/// Set once, when the session reaches the summary stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub summary: String,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub stage: Stage,
    pub warmup_log: Vec<WarmupEntry>,
    pub answer_log: Vec<AnswerRecord>,
    pub completion: Option<Completion>,
}

impl Session {
    pub fn warmup_index(&self) -> usize {
        match self.stage {
            Stage::Warmup { index } => index,
            _ => self.warmup_log.len(),
        }
    }

    pub fn interview_index(&self) -> usize {
        match self.stage {
            Stage::Interviewing { index } | Stage::Clarifying { index } => index,
            _ => self.answer_log.len(),
        }
    }

    pub fn is_clarifying(&self) -> bool {
        matches!(self.stage, Stage::Clarifying { .. })
    }
}
