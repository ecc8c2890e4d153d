//! Transcript — the human-readable record written once an interview reaches its summary.
//!
//! The engine emits a `CompletedInterview` event on a channel; `spawn_transcript_worker`
//! drains it into a `TranscriptWriter`. Write failures stop here and are only logged.

use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::interview::session::{AnswerRecord, Session, WarmupEntry};

const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
/// Suffixed names tried after the plain one is taken.
const MAX_NAME_ATTEMPTS: u32 = 100;

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("Transcript I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No free transcript file name for {0}")]
    NameExhausted(String),
}

/// Everything a transcript needs, captured at the moment the session entered `summary`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedInterview {
    pub session_id: String,
    pub warmup_log: Vec<WarmupEntry>,
    pub answer_log: Vec<AnswerRecord>,
    pub summary: String,
    pub completed_at: DateTime<Utc>,
}

impl CompletedInterview {
    /// Builds the event from a finished session. `None` until the session has a completion.
    pub fn from_session(session_id: &str, session: &Session) -> Option<Self> {
        let completion = session.completion.as_ref()?;
        Some(Self {
            session_id: session_id.to_string(),
            warmup_log: session.warmup_log.clone(),
            answer_log: session.answer_log.clone(),
            summary: completion.summary.clone(),
            completed_at: completion.completed_at,
        })
    }

    /// `<session>_<timestamp>.txt`, with the caller-supplied id reduced to path-safe characters.
    ///
    /// Distinct ids can reduce to the same name; the file writer never overwrites on disk.
    pub fn file_name(&self) -> String {
        format!("{}.txt", self.file_stem())
    }

    fn file_stem(&self) -> String {
        format!(
            "{}_{}",
            sanitize_session_id(&self.session_id),
            self.completed_at.format(FILE_TIMESTAMP_FORMAT)
        )
    }
}

pub fn render(transcript: &CompletedInterview) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Excel Mock Interview Transcript");
    let _ = writeln!(out, "Session ID: {}", transcript.session_id);
    let _ = writeln!(
        out,
        "Date: {}\n",
        transcript.completed_at.format(FILE_TIMESTAMP_FORMAT)
    );

    let _ = writeln!(out, "=== Warm-up ===");
    for (i, qa) in transcript.warmup_log.iter().enumerate() {
        let n = i + 1;
        let _ = writeln!(out, "Q{n}: {}", qa.question);
        let _ = writeln!(out, "A{n}: {}\n", qa.answer);
    }

    let _ = writeln!(out, "=== Technical Interview ===");
    for (i, qa) in transcript.answer_log.iter().enumerate() {
        let n = i + 1;
        let _ = writeln!(out, "Q{n}: {}", qa.question);
        let _ = writeln!(out, "A{n}: {}", qa.answer);
        let _ = writeln!(out, "Evaluation: {}\n", qa.evaluation);
    }

    let _ = writeln!(out, "=== Final Feedback ===");
    let _ = writeln!(out, "{}", transcript.summary);
    out
}

fn sanitize_session_id(session_id: &str) -> String {
    let cleaned: String = session_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "session".to_string()
    } else {
        cleaned
    }
}

/// Persists a transcript and returns a reference to the artifact (a path for the file writer).
#[async_trait]
pub trait TranscriptWriter: Send + Sync {
    async fn write(&self, transcript: &CompletedInterview) -> Result<String, TranscriptError>;
}

pub struct FileTranscriptWriter {
    dir: PathBuf,
}

impl FileTranscriptWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl TranscriptWriter for FileTranscriptWriter {
    async fn write(&self, transcript: &CompletedInterview) -> Result<String, TranscriptError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let (path, mut file) = create_unique(&self.dir, &transcript.file_stem()).await?;
        file.write_all(render(transcript).as_bytes()).await?;
        file.flush().await?;
        Ok(path.display().to_string())
    }
}

/// Creates `<stem>.txt`, or `<stem>-2.txt`, `<stem>-3.txt`, ... if taken. Never truncates.
async fn create_unique(dir: &Path, stem: &str) -> Result<(PathBuf, File), TranscriptError> {
    for attempt in 1..=MAX_NAME_ATTEMPTS {
        let name = if attempt == 1 {
            format!("{stem}.txt")
        } else {
            format!("{stem}-{attempt}.txt")
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Err(TranscriptError::NameExhausted(stem.to_string()))
}

/// Drains completion events into the writer until every sender is dropped.
pub fn spawn_transcript_worker<W>(
    mut events: mpsc::UnboundedReceiver<CompletedInterview>,
    writer: W,
) -> JoinHandle<()>
where
    W: TranscriptWriter + 'static,
{
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match writer.write(&event).await {
                Ok(artifact) => info!(session_id = %event.session_id, %artifact, "Transcript saved"),
                Err(e) => warn!(
                    session_id = %event.session_id,
                    "Transcript write failed (non-critical): {e}"
                ),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use chrono::TimeZone;

    use super::*;
    use crate::interview::session::{Completion, Stage};

    fn sample(session_id: &str) -> CompletedInterview {
        CompletedInterview {
            session_id: session_id.to_string(),
            warmup_log: vec![WarmupEntry {
                question: "Can you briefly introduce yourself?".to_string(),
                answer: "Jane".to_string(),
            }],
            answer_log: vec![AnswerRecord {
                question: "What is VLOOKUP?".to_string(),
                answer: "A lookup function".to_string(),
                evaluation: "Score: 6/10".to_string(),
            }],
            summary: "Solid basics.".to_string(),
            completed_at: Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap(),
        }
    }

    struct FailingWriter {
        attempts: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl TranscriptWriter for FailingWriter {
        async fn write(&self, _: &CompletedInterview) -> Result<String, TranscriptError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(std::io::Error::other("disk full").into())
        }
    }

    #[test]
    fn test_render_sections_in_order() {
        let text = render(&sample("abc"));
        let warmup = text.find("=== Warm-up ===").unwrap();
        let technical = text.find("=== Technical Interview ===").unwrap();
        let feedback = text.find("=== Final Feedback ===").unwrap();
        assert!(warmup < technical && technical < feedback);
        assert!(text.contains("Session ID: abc"));
        assert!(text.contains("Date: 2026-03-04_05-06-07"));
        assert!(text.contains("Q1: Can you briefly introduce yourself?\nA1: Jane\n"));
        assert!(text.contains("A1: A lookup function\nEvaluation: Score: 6/10\n"));
        assert!(text.ends_with("Solid basics.\n"));
    }

    #[test]
    fn test_file_name_sanitizes_session_id() {
        assert_eq!(
            sample("../../etc/passwd").file_name(),
            "______etc_passwd_2026-03-04_05-06-07.txt"
        );
        assert_eq!(sample("").file_name(), "session_2026-03-04_05-06-07.txt");
    }

    #[test]
    fn test_from_session_requires_completion() {
        let mut session = Session {
            stage: Stage::Summary,
            ..Session::default()
        };
        assert!(CompletedInterview::from_session("abc", &session).is_none());

        session.completion = Some(Completion {
            summary: "Done".to_string(),
            completed_at: Utc::now(),
        });
        let event = CompletedInterview::from_session("abc", &session).unwrap();
        assert_eq!(event.summary, "Done");
        assert_eq!(event.session_id, "abc");
    }

    #[tokio::test]
    async fn test_file_writer_creates_directory_and_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("transcripts");
        let writer = FileTranscriptWriter::new(dir.clone());

        let artifact = writer.write(&sample("abc")).await.unwrap();

        let expected = dir.join("abc_2026-03-04_05-06-07.txt");
        assert_eq!(artifact, expected.display().to_string());
        let written = std::fs::read_to_string(expected).unwrap();
        assert_eq!(written, render(&sample("abc")));
    }

    #[tokio::test]
    async fn test_file_writer_keeps_both_transcripts_when_names_collide() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = FileTranscriptWriter::new(tmp.path().to_path_buf());

        let mut alice = sample("team/alice");
        alice.summary = "ALICE".to_string();
        let mut bob = sample("team_alice");
        bob.summary = "BOB".to_string();
        assert_eq!(alice.file_name(), bob.file_name());

        let first = writer.write(&alice).await.unwrap();
        let second = writer.write(&bob).await.unwrap();
        assert_ne!(first, second);
        assert!(second.ends_with("team_alice_2026-03-04_05-06-07-2.txt"));

        let files = std::fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(files, 2);
        assert_eq!(std::fs::read_to_string(&first).unwrap(), render(&alice));
        assert_eq!(std::fs::read_to_string(&second).unwrap(), render(&bob));
    }

    #[tokio::test]
    async fn test_worker_survives_write_failures() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = spawn_transcript_worker(
            rx,
            FailingWriter {
                attempts: attempts.clone(),
            },
        );

        tx.send(sample("a")).unwrap();
        tx.send(sample("b")).unwrap();
        drop(tx);
        handle.await.unwrap();

        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
