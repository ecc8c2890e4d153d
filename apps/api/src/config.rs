use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_LLM_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_LLM_MODEL: &str = "llama-3.1-8b-instant";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm_api_url: String,
    pub llm_api_key: String,
    pub llm_model: String,
    pub port: u16,
    pub transcripts_dir: PathBuf,
    /// Optional JSON file replacing the built-in interview script.
    pub interview_script: Option<PathBuf>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            llm_api_url: env_or("LLM_API_URL", DEFAULT_LLM_API_URL),
            llm_api_key: require_env("LLM_API_KEY")?,
            llm_model: env_or("LLM_MODEL", DEFAULT_LLM_MODEL),
            port: env_or("PORT", "8000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            transcripts_dir: PathBuf::from(env_or("TRANSCRIPTS_DIR", "transcripts")),
            interview_script: std::env::var("INTERVIEW_SCRIPT").ok().map(PathBuf::from),
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
