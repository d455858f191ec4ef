use std::sync::Arc;

use crate::config::Config;
use crate::matching::JobMatcher;
use crate::parsing::ResumeParser;
use crate::upload::UploadStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is built before the listener binds and never mutated.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub parser: Arc<ResumeParser>,
    pub matcher: Arc<JobMatcher>,
    pub uploads: UploadStore,
}
