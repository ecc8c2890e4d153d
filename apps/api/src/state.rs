use std::sync::Arc;

use crate::config::Config;
use crate::interview::engine::InterviewEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Stage machine plus the session store it owns.
    pub engine: Arc<InterviewEngine>,
    pub config: Config,
}
