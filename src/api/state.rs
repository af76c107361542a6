use std::sync::Arc;

use crate::core::AppConfig;
use crate::openai::LanguageModel;

/// Shared by every request. Nothing in here is mutated after start up
/// so handlers can run concurrently without locking.
pub struct AppState {
    pub config: AppConfig,
    pub model: Arc<dyn LanguageModel>,
}

impl AppState {
    pub fn new(config: AppConfig, model: Arc<dyn LanguageModel>) -> Self {
        Self { config, model }
    }
}
