use std::sync::Arc;

use crate::config::SettingsStore;
use crate::services::TicketExtractionService;

#[derive(Clone)]
pub struct AppContext {
    pub settings: SettingsStore,
    pub extractor: Arc<dyn TicketExtractionService>,
}

impl AppContext {
    pub fn new(settings: SettingsStore, extractor: Arc<dyn TicketExtractionService>) -> Self {
        Self {
            settings,
            extractor,
        }
    }
}
