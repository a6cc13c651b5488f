use std::sync::Arc;

use crate::llm_client::CompletionService;
use crate::revision::RevisionPolicy;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend. `LlmClient` in production, scripted in tests.
    pub llm: Arc<dyn CompletionService>,
    /// Expected shared secret.
    pub secret: Arc<String>,
    pub revision: RevisionPolicy,
}
