//! Marketplace markup the scraper depends on.
//!
//! When the site changes its HTML, this is the file to update.

use std::sync::LazyLock;

use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid CSS")
}

/// Header naming a group of results ("Listings", "Spotlight Ads", ...).
pub static SECTION_HEADER: LazyLock<Selector> =
    LazyLock::new(|| selector(".search-right-head-panel"));

/// Anchor leading from a result tile to its detail page.
pub static DETAIL_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a.equip_link"));

/// Alternating label/value cells in the detail page spec table.
pub static AD_DETAIL: LazyLock<Selector> = LazyLock::new(|| selector(".ad_det_children"));

pub static MAP_TRIGGER: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"a[onclick="showAdvertMap()"]"#));

pub static TITLE: LazyLock<FieldLocatorChain> =
    LazyLock::new(|| FieldLocatorChain::new("title", &["h1.list-title"]));

pub static PRICE: LazyLock<FieldLocatorChain> = LazyLock::new(|| {
    FieldLocatorChain::new(
        "price",
        &["span.price_normal b", "span.price_gstex b", ".price_container"],
    )
});

pub static SELLER: LazyLock<FieldLocatorChain> =
    LazyLock::new(|| FieldLocatorChain::new("seller", &[".business-name"]));

/// Ordered extraction rules for one field. The first rule whose first match
/// has non-empty text wins.
#[derive(Debug)]
pub struct FieldLocatorChain {
    field: &'static str,
    rules: Vec<Selector>,
}

impl FieldLocatorChain {
    pub fn new(field: &'static str, rules: &[&str]) -> Self {
        let rules = rules
            .iter()
            .filter_map(|css| match Selector::parse(css) {
                Ok(selector) => Some(selector),
                Err(e) => {
                    log::warn!("Skipping {} rule '{}': {:?}", field, css, e);
                    None
                }
            })
            .collect();

        FieldLocatorChain { field, rules }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn resolve(&self, document: &Html) -> Option<String> {
        self.rules.iter().find_map(|rule| {
            document
                .select(rule)
                .next()
                .map(|element| element_text(&element))
                .filter(|text| !text.is_empty())
        })
    }
}

/// Text content with whitespace runs collapsed and ends trimmed.
pub fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .join(" ")
}
