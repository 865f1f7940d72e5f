use super::decoder::{decode_product_field, DecodedProduct};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of product/quantity column pairs carried by every order row.
pub const PRODUCT_SLOTS: usize = 5;

/// District label used when an order carries no district.
pub const UNKNOWN_DISTRICT: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Verified,
    Rejected,
    Other(String),
}

impl ApprovalStatus {
    /// Statuses are matched exactly after trimming; anything else is kept verbatim.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "Pending" => Self::Pending,
            "Verified" => Self::Verified,
            "Rejected" => Self::Rejected,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::Verified => "Verified",
            Self::Rejected => "Rejected",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified)
    }
}

/// One product column pair of an order row, kept as the raw cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSlot {
    pub product: String,
    pub quantity: String,
}

impl ProductSlot {
    pub fn new(product: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            quantity: quantity.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.product.trim().is_empty()
    }

    pub fn decoded(&self) -> DecodedProduct {
        decode_product_field(&self.product)
    }

    /// Units ordered; missing, non-numeric and non-positive quantities count as zero.
    pub fn quantity(&self) -> u64 {
        leading_integer(&self.quantity)
            .filter(|value| *value > 0)
            .map(|value| value as u64)
            .unwrap_or(0)
    }
}

/// A single imported order row. Records are never mutated after import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub entry_date: String,
    pub rin: String,
    pub retailer_name: String,
    pub farmer_name: String,
    pub farmer_mobile: String,
    pub district: String,
    pub land_acreage: String,
    pub crops_selected: String,
    pub approval_status: String,
    pub products: [ProductSlot; PRODUCT_SLOTS],
}

impl OrderRecord {
    /// Farmers are identified by mobile number; an empty number is still a key.
    pub fn farmer_key(&self) -> &str {
        self.farmer_mobile.trim()
    }

    pub fn status(&self) -> ApprovalStatus {
        ApprovalStatus::parse(&self.approval_status)
    }

    pub fn district_or_unknown(&self) -> &str {
        let district = self.district.trim();
        if district.is_empty() {
            UNKNOWN_DISTRICT
        } else {
            district
        }
    }

    pub fn land_acreage(&self) -> f64 {
        leading_decimal(&self.land_acreage).unwrap_or(0.0)
    }

    pub fn crops(&self) -> impl Iterator<Item = &str> {
        self.crops_selected
            .split(',')
            .map(str::trim)
            .filter(|crop| !crop.is_empty())
    }

    pub fn entry_date(&self) -> Option<NaiveDate> {
        parse_entry_date(&self.entry_date)
    }

    pub fn total_units(&self) -> u64 {
        self.products
            .iter()
            .map(ProductSlot::quantity)
            .fold(0, u64::saturating_add)
    }
}

/// Parses entry dates written day-month-year (`15-01-2025`, `15/01/2025 10:30`),
/// ISO dates and a few spelled-out month forms.
pub fn parse_entry_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parts: Vec<&str> = trimmed
        .split(|c: char| c == '-' || c == '/' || c == '.' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();

    if parts.len() >= 3 {
        let numbers: Option<Vec<u32>> = parts[..3]
            .iter()
            .map(|part| part.parse::<u32>().ok())
            .collect();

        if let Some(numbers) = numbers {
            let (year, month, day) = if parts[0].len() == 4 {
                (numbers[0], numbers[1], numbers[2])
            } else {
                (numbers[2], numbers[1], numbers[0])
            };
            let year = if year < 100 { year + 2000 } else { year };
            return NaiveDate::from_ymd_opt(year as i32, month, day);
        }
    }

    ["%d %b %Y", "%d %B %Y", "%d-%b-%Y", "%b %d, %Y", "%B %d, %Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Integer prefix of `raw` (`"12 bags"` -> 12), ignoring surrounding whitespace.
pub(crate) fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    digits[..end].parse::<i64>().ok().map(|value| value * sign)
}

/// Decimal prefix of `raw` (`"4.5 acres"` -> 4.5).
pub(crate) fn leading_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_digit = false;

    for (idx, ch) in trimmed.char_indices() {
        match ch {
            '+' | '-' if idx == 0 => {}
            '.' if !seen_dot => seen_dot = true,
            c if c.is_ascii_digit() => seen_digit = true,
            _ => break,
        }
        end = idx + ch.len_utf8();
    }

    if !seen_digit {
        return None;
    }

    trimmed[..end].parse::<f64>().ok()
}
