use crate::autofill::AutofillEngine;
use crate::backend_client::BackendClient;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub backend: BackendClient,
    /// Engine used by the preview endpoint; its scheduler and delays come from config.
    pub engine: AutofillEngine,
}
