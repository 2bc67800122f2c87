use std::collections::HashMap;

use scraper::{ElementRef, Html};

use crate::domain::{
    price::PriceRule,
    product::{ProductRecord, NOT_AVAILABLE},
};

use super::selectors::{element_text, AD_DETAIL, MAP_TRIGGER, PRICE, SELLER, TITLE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum DetailLabel {
    Condition,
    Make,
    Model,
    Year,
}

impl DetailLabel {
    fn parse(text: &str) -> Option<Self> {
        match text.trim().trim_end_matches(':').trim_end() {
            "Condition" => Some(DetailLabel::Condition),
            "Make" => Some(DetailLabel::Make),
            "Model" => Some(DetailLabel::Model),
            "Year" => Some(DetailLabel::Year),
            _ => None,
        }
    }
}

/// Builds a record from one detail page. Never fails: anything the page does
/// not provide falls back to its sentinel.
pub fn extract_product(url: &str, html: &str, price_rule: PriceRule) -> ProductRecord {
    let document = Html::parse_document(html);
    let details = detail_map(&document);
    let detail = |label: DetailLabel| {
        details
            .get(&label)
            .cloned()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };

    let raw_price = PRICE
        .resolve(&document)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    ProductRecord {
        brand: detail(DetailLabel::Make),
        model: detail(DetailLabel::Model),
        condition: detail(DetailLabel::Condition),
        location: extract_location(&document),
        seller: SELLER
            .resolve(&document)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        year: detail(DetailLabel::Year),
        price: price_rule.apply(&raw_price),
        url: url.to_string(),
        title: TITLE
            .resolve(&document)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    }
}

/// Keeps the region: "Dandenong South, VIC" becomes "VIC".
fn extract_location(document: &Html) -> String {
    match document.select(&MAP_TRIGGER).next() {
        Some(element) => {
            let text = element_text(&element);
            match text.rsplit_once(',') {
                Some((_, region)) => region.trim().to_string(),
                None => text,
            }
        }
        None => NOT_AVAILABLE.to_string(),
    }
}

/// One pass over the spec table cells collecting (label, value) pairs, where
/// the value is the next sibling cell. Later duplicates win.
fn detail_map(document: &Html) -> HashMap<DetailLabel, String> {
    document
        .select(&AD_DETAIL)
        .filter_map(|cell| {
            let label = DetailLabel::parse(&element_text(&cell))?;
            let value = cell
                .next_siblings()
                .find_map(ElementRef::wrap)
                .filter(|sibling| AD_DETAIL.matches(sibling))?;

            Some((label, element_text(&value)))
        })
        .filter(|(_, value)| !value.is_empty())
        .collect()
}
