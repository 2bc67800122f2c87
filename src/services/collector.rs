use itertools::Itertools;
use scraper::{ElementRef, Html};
use url::Url;

use crate::{
    domain::{
        product::ListingReference,
        section::{SectionBoundary, SectionScanner},
    },
    error::EmptyResultError,
};

use super::selectors::{element_text, DETAIL_LINK, SECTION_HEADER};

/// Detail-page references found inside the target section.
#[derive(Debug)]
pub struct CollectedListings {
    pub boundary: SectionBoundary,
    pub references: Vec<ListingReference>,
}

/// Walks the listing page in document order and keeps the detail links that
/// sit between the target section header and the header after it.
pub fn collect_listing_references(
    html: &str,
    origin: &Url,
) -> Result<CollectedListings, EmptyResultError> {
    let document = Html::parse_document(html);
    let mut scanner = SectionScanner::new();
    let mut hrefs: Vec<&str> = vec![];

    for element in document.root_element().descendants().filter_map(ElementRef::wrap) {
        if SECTION_HEADER.matches(&element) {
            scanner.observe_header(&element_text(&element));
            continue;
        }

        if scanner.is_inside() && DETAIL_LINK.matches(&element) {
            if let Some(href) = element.value().attr("href") {
                hrefs.push(href);
            }
        }
    }

    let boundary = scanner.finish().ok_or(EmptyResultError::SectionNotFound)?;

    let references: Vec<ListingReference> = hrefs
        .into_iter()
        .filter_map(|href| match origin.join(href.trim()) {
            Ok(url) => Some(url),
            Err(e) => {
                log::warn!("Skipping listing href '{}': {}", href, e);
                None
            }
        })
        .unique()
        .enumerate()
        .map(|(position, url)| ListingReference { url, position })
        .collect();

    if references.is_empty() {
        return Err(EmptyResultError::NoLinks {
            section: boundary.start_label,
        });
    }

    Ok(CollectedListings {
        boundary,
        references,
    })
}
