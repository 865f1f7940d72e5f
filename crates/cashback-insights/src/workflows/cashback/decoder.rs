//! Product cells arrive as free text such as
//! `"YaraLiva Nitrabor \n Cashback Amount : ₹25"`. All knowledge of that
//! encoding lives here; valuation and catalog lookups only see the decoded pair.

use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedProduct {
    /// Canonical product name, with the cashback annotation removed.
    pub name: String,
    /// Per-unit cashback written into the cell; zero when absent.
    pub embedded_cashback: u64,
}

impl DecodedProduct {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

fn marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)cashback\s*amount").expect("invalid marker regex"))
}

fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)cashback\s*amount\s*[:：]\s*(?:₹|rs\.?|inr)?\s*(\d[\d,]*)")
            .expect("invalid cashback amount regex")
    })
}

pub fn decode_product_field(raw: &str) -> DecodedProduct {
    let cleaned = raw
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '\u{201c}' || c == '\u{201d}')
        .trim();

    if cleaned.is_empty() {
        return DecodedProduct::default();
    }

    let name_part = match marker_re().find(cleaned) {
        Some(marker) => &cleaned[..marker.start()],
        None => cleaned,
    };

    DecodedProduct {
        name: collapse_whitespace(name_part),
        embedded_cashback: embedded_cashback(cleaned),
    }
}

fn embedded_cashback(text: &str) -> u64 {
    amount_re()
        .captures(text)
        .and_then(|captures| captures.get(1))
        .and_then(|amount| amount.as_str().replace(',', "").parse::<u64>().ok())
        .unwrap_or(0)
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
