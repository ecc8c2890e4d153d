mod config;
mod errors;
mod interview;
mod llm_client;
mod routes;
mod state;
mod transcript;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::interview::assessor::Assessor;
use crate::interview::engine::InterviewEngine;
use crate::interview::script::InterviewScript;
use crate::interview::store::InMemorySessionStore;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::transcript::{spawn_transcript_worker, FileTranscriptWriter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting interviewer v{}", env!("CARGO_PKG_VERSION"));

    let script = match &config.interview_script {
        Some(path) => InterviewScript::from_file(path)?,
        None => InterviewScript::default().validated()?,
    };
    info!(
        "Interview script loaded: {} warm-up, {} technical questions",
        script.warmup_questions.len(),
        script.technical_questions.len()
    );

    let llm = LlmClient::new(
        config.llm_api_url.clone(),
        config.llm_api_key.clone(),
        config.llm_model.clone(),
    )?;
    info!("LLM client initialized (model: {})", llm.model());

    // Transcripts are written off the reply path
    let (completions_tx, completions_rx) = mpsc::unbounded_channel();
    spawn_transcript_worker(
        completions_rx,
        FileTranscriptWriter::new(config.transcripts_dir.clone()),
    );
    info!("Transcripts will be written to {}", config.transcripts_dir.display());

    let engine = InterviewEngine::new(
        Arc::new(script),
        Arc::new(InMemorySessionStore::new()),
        Assessor::new(Arc::new(llm)),
        completions_tx,
    );

    let state = AppState {
        engine: Arc::new(engine),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // chat UI is served from another origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
