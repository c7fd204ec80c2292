use tracing::error;

use crate::context::AppContext;
use crate::domain::ticket::TicketRecord;

/// Extracts a ticket from pasted travel text using the currently stored
/// provider settings.
///
/// Every failure (missing key, provider error, unparseable reply) is logged and
/// reported as `None`; the caller falls back to manual entry. Empty input must
/// be rejected by the caller before this is invoked.
pub async fn parse_ticket_text(ctx: &AppContext, text: &str) -> Option<TicketRecord> {
    let config = ctx.settings.resolve();

    match ctx.extractor.extract(text, &config).await {
        Ok(record) => Some(record),
        Err(err) => {
            error!(provider = config.provider.as_str(), error = %err, "ticket extraction failed");
            None
        }
    }
}
