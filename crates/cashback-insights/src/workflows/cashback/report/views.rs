use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyMetrics {
    pub total_orders: usize,
    pub unique_farmers: usize,
    pub pending: usize,
    pub verified: usize,
    pub rejected: usize,
    pub winners: usize,
    pub total_cashback: u64,
    pub active_retailers: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductSalesEntry {
    pub product: String,
    pub units: u64,
    /// Number of order slots naming the product.
    pub orders: usize,
    pub cashback: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CropFrequencyEntry {
    pub crop: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistrictStatsEntry {
    pub district: String,
    pub farmers: usize,
    pub winners: usize,
    pub orders: usize,
    pub cashback: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetailerStatsEntry {
    pub rin: String,
    pub name: String,
    pub orders: usize,
    pub farmers: usize,
    pub verified: usize,
    pub total_units: u64,
    /// Percentage of orders verified, one decimal place.
    pub verification_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetEntry {
    pub product: String,
    pub pack_size: String,
    pub budget: u64,
    pub consumed: u64,
    /// Negative once the programme budget is overspent.
    pub remaining: i64,
    pub units: u64,
    pub consumed_pct: f64,
    /// `consumed_pct` capped at 100 for progress bars.
    pub display_pct: f64,
}

pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `part / whole * 100` to one decimal, zero when `whole` is zero.
pub(crate) fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_one_decimal(part as f64 / whole as f64 * 100.0)
}
