use std::io::{self, Read};

use crate::context::AppContext;
use crate::domain::ticket::TicketRecord;
use crate::error::{AppError, AppResult};
use crate::workflow::parse::parse_ticket_text;

#[derive(Debug, Clone)]
pub struct ParseCommandArgs {
    pub text: Option<String>,
}

/// Returns `Ok(None)` when the provider could not recognize a ticket.
pub async fn run(ctx: &AppContext, args: ParseCommandArgs) -> AppResult<Option<TicketRecord>> {
    let text = match args.text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    if text.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "ticket text must not be empty".to_string(),
        ));
    }

    Ok(parse_ticket_text(ctx, &text).await)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use tempfile::TempDir;

    use super::*;
    use crate::config::{ProviderConfig, SettingsStore};
    use crate::services::TicketExtractionService;
    use crate::infra::provider::ProviderAdapter;
    use crate::test_support::test_client;

    #[tokio::test]
    async fn rejects_blank_text_before_extraction() {
        let dir = TempDir::new().unwrap();
        let ctx = AppContext::new(
            SettingsStore::at(dir.path().join("settings.json")),
            Arc::new(ProviderAdapter::with_client(
                test_client(),
                "http://127.0.0.1:9",
                None,
            )),
        );

        let err = run(
            &ctx,
            ParseCommandArgs {
                text: Some("  \n\t".to_string()),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[derive(Default)]
    struct CapturingExtractor {
        texts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TicketExtractionService for CapturingExtractor {
        async fn extract(&self, raw_text: &str, _config: &ProviderConfig) -> AppResult<TicketRecord> {
            self.texts.lock().unwrap().push(raw_text.to_string());
            Ok(TicketRecord::default())
        }
    }

    #[tokio::test]
    async fn passes_text_through_unmodified() {
        let dir = TempDir::new().unwrap();
        let extractor = Arc::new(CapturingExtractor::default());
        let ctx = AppContext::new(
            SettingsStore::at(dir.path().join("settings.json")),
            extractor.clone(),
        );
        let text = "  G123 北京南-上海虹桥\n 08:00 \n";

        let ticket = run(
            &ctx,
            ParseCommandArgs {
                text: Some(text.to_string()),
            },
        )
        .await
        .unwrap();
        assert!(ticket.is_some());
        assert_eq!(extractor.texts.lock().unwrap().as_slice(), [text.to_string()]);
    }
}
