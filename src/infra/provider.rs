use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::{DEFAULT_GEMINI_MODEL, ProviderCapability, ProviderConfig, ProviderKind};
use crate::domain::normalize::normalize;
use crate::domain::ticket::TicketRecord;
use crate::error::{AppError, AppResult};
use crate::infra::chat::ChatCompletionClient;
use crate::infra::gemini::{GEMINI_ENDPOINT, GeminiClient};
use crate::services::TicketExtractionService;

/// Routes an extraction to the structured-output or chat-completion protocol
/// depending on the configured provider.
pub struct ProviderAdapter {
    gemini: GeminiClient,
    chat: ChatCompletionClient,
    builtin_api_key: Option<String>,
}

impl ProviderAdapter {
    /// `builtin_api_key` is the key used by the built-in Gemini provider.
    pub fn new(builtin_api_key: Option<String>) -> Self {
        Self::with_client(Client::new(), GEMINI_ENDPOINT, builtin_api_key)
    }

    pub fn with_client(
        http: Client,
        gemini_endpoint: &str,
        builtin_api_key: Option<String>,
    ) -> Self {
        Self {
            gemini: GeminiClient::new(http.clone(), gemini_endpoint),
            chat: ChatCompletionClient::new(http),
            builtin_api_key,
        }
    }

    fn gemini_api_key<'a>(&'a self, config: &'a ProviderConfig) -> AppResult<&'a str> {
        let key = match config.provider {
            ProviderKind::GeminiCustomKey => Some(config.api_key.as_str()),
            _ => self.builtin_api_key.as_deref(),
        };
        match key.map(str::trim).filter(|key| !key.is_empty()) {
            Some(key) => Ok(key),
            None => {
                warn!(provider = config.provider.as_str(), "Gemini API key is missing");
                Err(AppError::MissingCredential(format!(
                    "no API key available for provider {}",
                    config.provider.as_str()
                )))
            }
        }
    }

    fn gemini_model(config: &ProviderConfig) -> &str {
        match config.provider {
            ProviderKind::GeminiCustomKey if !config.model.trim().is_empty() => {
                config.model.trim()
            }
            _ => DEFAULT_GEMINI_MODEL,
        }
    }
}

#[async_trait]
impl TicketExtractionService for ProviderAdapter {
    async fn extract(&self, raw_text: &str, config: &ProviderConfig) -> AppResult<TicketRecord> {
        info!(provider = config.provider.as_str(), "extracting ticket");

        let raw = match config.provider.capability() {
            ProviderCapability::StructuredOutput => {
                let api_key = self.gemini_api_key(config)?;
                self.gemini
                    .extract(raw_text, api_key, Self::gemini_model(config))
                    .await?
            }
            ProviderCapability::ChatCompletion => self.chat.extract(raw_text, config).await?,
        };

        let record = normalize(&raw);
        debug!(kind = record.transport_kind.as_str(), "ticket extracted");
        Ok(record)
    }
}
