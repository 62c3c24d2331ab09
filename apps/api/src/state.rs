use std::sync::Arc;

use crate::delivery::MailTransport;
use crate::llm_client::CompletionService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Completion service behind extraction and drafting. `LlmClient` in production.
    pub llm: Arc<dyn CompletionService>,
    /// Mail transport for the send route. `None` disables sending (501).
    pub mailer: Option<Arc<dyn MailTransport>>,
}
