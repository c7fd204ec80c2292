use async_trait::async_trait;

use crate::config::ProviderConfig;
use crate::domain::ticket::TicketRecord;
use crate::error::AppResult;

#[async_trait]
pub trait TicketExtractionService: Send + Sync {
    /// Issues exactly one provider request for `raw_text` under `config`.
    async fn extract(&self, raw_text: &str, config: &ProviderConfig) -> AppResult<TicketRecord>;
}
