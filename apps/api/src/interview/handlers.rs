//! Axum route handlers for the chat and session endpoints.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::session::{AnswerRecord, Completion, Phase, Session, Stage, WarmupEntry};
use crate::state::AppState;
use crate::transcript::{render, CompletedInterview};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Omitted on the first message of a client that does not mint its own ids.
    #[serde(default)]
    pub session_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub response: String,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub phase: Phase,
    #[serde(flatten)]
    pub stage: Stage,
    pub warmup_index: usize,
    pub interview_index: usize,
    pub is_clarifying: bool,
    pub warmup_log: Vec<WarmupEntry>,
    pub answer_log: Vec<AnswerRecord>,
    pub completion: Option<Completion>,
}

impl SessionView {
    fn new(session_id: String, session: Session) -> Self {
        Self {
            session_id,
            phase: session.stage.phase(),
            stage: session.stage,
            warmup_index: session.warmup_index(),
            interview_index: session.interview_index(),
            is_clarifying: session.is_clarifying(),
            warmup_log: session.warmup_log,
            answer_log: session.answer_log,
            completion: session.completion,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /chat
///
/// Feeds one candidate message into the interview and returns the interviewer's reply.
/// Empty messages are passed through; only a blank session id is rejected.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let session_id = match request.session_id {
        Some(id) if id.trim().is_empty() => {
            return Err(AppError::Validation(
                "session_id cannot be blank".to_string(),
            ))
        }
        Some(id) => id,
        None => Uuid::new_v4().to_string(),
    };

    let response = state
        .engine
        .handle_message(&session_id, &request.message)
        .await;

    Ok(Json(ChatResponse {
        session_id,
        response,
    }))
}

/// GET /sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let session = state
        .engine
        .store()
        .get(&session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;

    Ok(Json(SessionView::new(session_id, session)))
}

/// DELETE /sessions/:id
///
/// Restart: the next message with this id begins a new interview.
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.engine.store().remove(&session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {session_id} not found")))
    }
}

/// GET /sessions/:id/transcript
///
/// Plain-text transcript download, available once the interview has been summarized.
pub async fn handle_get_transcript(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = state
        .engine
        .store()
        .get(&session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;

    let transcript = CompletedInterview::from_session(&session_id, &session).ok_or_else(|| {
        AppError::Conflict(format!("Interview {session_id} has not finished yet"))
    })?;

    let disposition = format!("attachment; filename=\"{}\"", transcript.file_name());
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        render(&transcript),
    ))
}
