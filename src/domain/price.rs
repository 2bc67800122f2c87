use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

static LEADING_DOLLAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\s?\d[\d,]*(?:\.\d+)?").expect("valid price regex"));

/// How a raw price string becomes the exported `Price` value.
///
/// `HyphenStrip` is canonical. The other two reproduce exports made by
/// earlier revisions of the scraper and are only selected through
/// configuration when output must match one of those datasets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceRule {
    #[default]
    HyphenStrip,
    /// Legacy: raw text, trimmed.
    Passthrough,
    /// Legacy: first `$`-prefixed number, as written.
    LeadingDollar,
}

impl PriceRule {
    pub fn apply(self, raw: &str) -> String {
        match self {
            PriceRule::HyphenStrip => normalize_price(raw),
            PriceRule::Passthrough => raw.trim().to_string(),
            PriceRule::LeadingDollar => LEADING_DOLLAR
                .find(raw)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        }
    }
}

/// Empty means "price on application".
pub fn normalize_price(raw: &str) -> String {
    if !raw.chars().any(|c| c.is_ascii_digit()) || raw.to_lowercase().contains("ask") {
        return String::new();
    }

    // Ranges are "low - high"; only the segment after the first hyphen counts.
    let upper_bound = match raw.contains('-') {
        true => raw.split('-').nth(1).unwrap_or_default(),
        false => raw,
    };

    upper_bound.chars().filter(char::is_ascii_digit).collect()
}
