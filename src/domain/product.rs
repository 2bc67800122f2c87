use serde::Serialize;
use url::Url;

/// Sentinel for a text field the detail page did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// A detail-page link discovered inside the target section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingReference {
    pub url: Url,
    pub position: usize,
}

/// One normalized listing, serialized with the export column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRecord {
    #[serde(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Condition")]
    pub condition: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Seller")]
    pub seller: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Price")]
    pub price: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "AD Title")]
    pub title: String,
}

impl ProductRecord {
    /// True when anything besides the source URL was read off the page.
    /// A price left at the sentinel by a legacy rule does not count.
    pub fn has_recovered_fields(&self) -> bool {
        let text_fields = [
            &self.brand,
            &self.model,
            &self.condition,
            &self.location,
            &self.seller,
            &self.year,
            &self.title,
        ];

        let price_recovered = !self.price.is_empty() && self.price != NOT_AVAILABLE;

        price_recovered || text_fields.iter().any(|field| field.as_str() != NOT_AVAILABLE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub url: String,
    pub reason: String,
}

/// Everything a finished run produced.
#[derive(Debug, Default)]
pub struct ScrapeOutcome {
    pub products: Vec<ProductRecord>,
    pub failures: Vec<ItemFailure>,
}

impl ScrapeOutcome {
    pub fn success_count(&self) -> usize {
        self.products.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}
