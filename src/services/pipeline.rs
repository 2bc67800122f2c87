use std::{future::Future, sync::Arc, time::Duration};

use tokio::sync::mpsc::Sender;
use url::Url;
use uuid::Uuid;

use crate::{
    configuration::ScraperSettings,
    domain::{
        event::ScrapeEvent,
        price::PriceRule,
        product::{ItemFailure, ListingReference, ProductRecord, ScrapeOutcome},
    },
    error::{ItemError, ScrapeError, ValidationError},
};

use super::{collect_listing_references, extract_product, DocumentFetcher};

/// Fetches one listing page and every detail page it links to, one at a time.
#[derive(Clone)]
pub struct ScrapePipeline {
    fetcher: Arc<dyn DocumentFetcher>,
    origin: Url,
    allowed_domain: String,
    pacing: Duration,
    price_rule: PriceRule,
}

impl ScrapePipeline {
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        origin: Url,
        allowed_domain: impl Into<String>,
        pacing: Duration,
        price_rule: PriceRule,
    ) -> Self {
        ScrapePipeline {
            fetcher,
            origin,
            allowed_domain: allowed_domain.into(),
            pacing,
            price_rule,
        }
    }

    pub fn from_settings(
        fetcher: Arc<dyn DocumentFetcher>,
        settings: &ScraperSettings,
    ) -> Result<Self, url::ParseError> {
        Ok(Self::new(
            fetcher,
            settings.origin_url()?,
            settings.allowed_domain.clone(),
            settings.pacing(),
            settings.price_rule,
        ))
    }

    /// Accepts absolute http(s) URLs on the marketplace domain or one of its
    /// subdomains.
    pub fn validate_listing_url(&self, raw: Option<&str>) -> Result<Url, ValidationError> {
        let raw = raw.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Err(ValidationError::MissingUrl);
        }

        let url = Url::parse(raw).map_err(|e| ValidationError::MalformedUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValidationError::MalformedUrl {
                url: raw.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        let host = url
            .host_str()
            .ok_or_else(|| ValidationError::MalformedUrl {
                url: raw.to_string(),
                reason: "URL has no host".to_string(),
            })?
            .to_lowercase();

        let domain = self.allowed_domain.to_lowercase();
        let on_domain = host == domain
            || host
                .strip_suffix(&domain)
                .is_some_and(|prefix| prefix.ends_with('.'));
        if !on_domain {
            return Err(ValidationError::ForeignDomain {
                host,
                domain: self.allowed_domain.clone(),
            });
        }

        Ok(url)
    }

    /// Buffered mode: the whole outcome once every detail page is done.
    pub async fn run(&self, url: &Url) -> Result<ScrapeOutcome, ScrapeError> {
        self.execute(url, &Progress::new(None)).await
    }

    /// Progressive mode: status and product events as they happen, then one
    /// `done` or `error` event. Nothing is sent once the receiver is gone.
    pub async fn stream(&self, url: Url, events: Sender<ScrapeEvent>) {
        let progress = Progress::new(Some(&events));

        let terminal = match self.execute(&url, &progress).await {
            Ok(outcome) => ScrapeEvent::done(&outcome),
            Err(ScrapeError::Cancelled) => {
                log::info!("[{}] Consumer disconnected, dropping run", progress.run_id);
                return;
            }
            Err(e) => ScrapeEvent::Error {
                message: e.to_string(),
            },
        };

        _ = events.send(terminal).await;
    }

    async fn execute(&self, url: &Url, progress: &Progress<'_>) -> Result<ScrapeOutcome, ScrapeError> {
        let run_id = progress.run_id;
        progress
            .emit(ScrapeEvent::status(format!("Starting scrape for: {url}")))
            .await?;

        let main_document = match progress.guard(self.fetcher.fetch(url)).await? {
            Ok(document) => document,
            Err(e) => {
                log::error!("[{}] Failed to fetch listing page: {}", run_id, e);
                return Err(e.into());
            }
        };

        let listings = match collect_listing_references(&main_document, &self.origin) {
            Ok(listings) => listings,
            Err(e) => {
                log::error!("[{}] {}", run_id, e);
                return Err(e.into());
            }
        };

        let total = listings.references.len();
        log::info!(
            "[{}] Found {} unique listings in '{}' section",
            run_id,
            total,
            listings.boundary.start_label
        );
        progress
            .emit(ScrapeEvent::status(format!(
                "Found {total} unique products to scrape. Starting detail scraping..."
            )))
            .await?;

        let mut outcome = ScrapeOutcome::default();

        for reference in listings.references {
            if reference.position > 0 {
                progress.guard(tokio::time::sleep(self.pacing)).await?;
            }

            let done = reference.position + 1;
            progress
                .emit(ScrapeEvent::status(format!(
                    "Scraping product {}/{} ({}%)...",
                    done,
                    total,
                    done * 100 / total
                )))
                .await?;

            match progress.guard(self.scrape_detail(&reference)).await? {
                Ok(record) => {
                    progress.emit(ScrapeEvent::Product(record.clone())).await?;
                    outcome.products.push(record);
                }
                Err(e) => {
                    log::warn!("[{}] Skipping {}: {}", run_id, reference.url, e);
                    outcome.failures.push(ItemFailure {
                        url: reference.url.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        log::info!(
            "[{}] Scraped {} products, {} failed",
            run_id,
            outcome.success_count(),
            outcome.failure_count()
        );

        Ok(outcome)
    }

    async fn scrape_detail(&self, reference: &ListingReference) -> Result<ProductRecord, ItemError> {
        let html = self.fetcher.fetch(&reference.url).await?;
        let record = extract_product(reference.url.as_str(), &html, self.price_rule);

        match record.has_recovered_fields() {
            true => Ok(record),
            false => Err(ItemError::NoRecoverableFields),
        }
    }
}

/// Per-run event sink. Without a channel, status lines only go to the log.
struct Progress<'a> {
    run_id: Uuid,
    events: Option<&'a Sender<ScrapeEvent>>,
}

impl<'a> Progress<'a> {
    fn new(events: Option<&'a Sender<ScrapeEvent>>) -> Self {
        Progress {
            run_id: Uuid::new_v4(),
            events,
        }
    }

    async fn emit(&self, event: ScrapeEvent) -> Result<(), ScrapeError> {
        match self.events {
            Some(sender) => sender
                .send(event)
                .await
                .map_err(|_| ScrapeError::Cancelled),
            None => {
                if let ScrapeEvent::Status { message } = &event {
                    log::info!("[{}] {}", self.run_id, message);
                }
                Ok(())
            }
        }
    }

    /// Runs `work` unless the consumer disconnects first.
    async fn guard<T>(&self, work: impl Future<Output = T>) -> Result<T, ScrapeError> {
        match self.events {
            Some(sender) => tokio::select! {
                out = work => Ok(out),
                _ = sender.closed() => Err(ScrapeError::Cancelled),
            },
            None => Ok(work.await),
        }
    }
}
