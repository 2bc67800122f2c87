//! Error types for a scrape run.
//!
//! Main-page errors (`ValidationError`, `NetworkError`, `EmptyResultError`)
//! abort a run and surface through `ScrapeError`. Detail-page errors are
//! `ItemError`s and only ever count against a single listing.

use thiserror::Error;

/// Rejected input, raised before any request is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("URL is required")]
    MissingUrl,

    #[error("Invalid URL '{url}': {reason}")]
    MalformedUrl { url: String, reason: String },

    #[error("URL host '{host}' is not part of {domain}")]
    ForeignDomain { host: String, domain: String },

    #[error("Invalid request body: {reason}")]
    MalformedBody { reason: String },
}

/// A fetch that did not produce a document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("HTTP error! status: {status} ({url})")]
    Status { url: String, status: u16 },

    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
}

/// The listing page was fetched but yielded nothing to scrape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmptyResultError {
    #[error("Could not find a 'Listings' or 'Search Results' section.")]
    SectionNotFound,

    #[error("No product tiles were found within the '{section}' section.")]
    NoLinks { section: String },
}

/// Failure of a single detail page.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ItemError {
    #[error(transparent)]
    Fetch(#[from] NetworkError),

    #[error("no recoverable fields on detail page")]
    NoRecoverableFields,
}

/// Fatal outcome of a scrape run.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    EmptyResult(#[from] EmptyResultError),

    /// The consumer went away before the run finished.
    #[error("scrape cancelled by consumer")]
    Cancelled,
}
