use serde::Serialize;

use super::product::{ProductRecord, ScrapeOutcome};

/// One message on the progressive result channel.
///
/// Serializes to the event's data payload only; the event name comes from
/// [`ScrapeEvent::name`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ScrapeEvent {
    Status {
        message: String,
    },
    Product(ProductRecord),
    Done {
        message: String,
        count: usize,
        failed: usize,
    },
    Error {
        message: String,
    },
}

impl ScrapeEvent {
    pub fn status(message: impl Into<String>) -> Self {
        ScrapeEvent::Status {
            message: message.into(),
        }
    }

    pub fn done(outcome: &ScrapeOutcome) -> Self {
        let count = outcome.success_count();
        let failed = outcome.failure_count();
        let message = match failed {
            0 => format!("Scraping complete! Successfully scraped {count} products."),
            _ => format!(
                "Scraping complete! Successfully scraped {count} products ({failed} failed)."
            ),
        };

        ScrapeEvent::Done {
            message,
            count,
            failed,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScrapeEvent::Status { .. } => "status",
            ScrapeEvent::Product(_) => "product",
            ScrapeEvent::Done { .. } => "done",
            ScrapeEvent::Error { .. } => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ScrapeEvent::Done { .. } | ScrapeEvent::Error { .. })
    }
}
