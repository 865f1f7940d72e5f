//! Farmer-scoped cashback eligibility.
//!
//! Pass one totals every farmer's order value over the active subset, split
//! into all statuses and `Verified` only. Pass two grants an order its cashback
//! when the order itself is `Verified` and its farmer's verified total has
//! reached the threshold. The rule is evaluated against the final totals, so
//! every verified order of a qualifying farmer earns cashback.

use super::catalog::ProductCatalog;
use super::domain::OrderRecord;
use super::valuation::{order_value, potential_cashback};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_CASHBACK_THRESHOLD: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EligibilityRule {
    /// Minimum cumulative verified order value a farmer needs.
    pub threshold: u64,
}

impl EligibilityRule {
    pub const fn new(threshold: u64) -> Self {
        Self { threshold }
    }

    pub fn qualifies(&self, order_verified: bool, farmer_verified_value: u64) -> bool {
        order_verified && farmer_verified_value >= self.threshold
    }
}

impl Default for EligibilityRule {
    fn default() -> Self {
        Self::new(DEFAULT_CASHBACK_THRESHOLD)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FarmerTotals {
    pub total_value: u64,
    pub verified_value: u64,
    pub order_ids: Vec<String>,
    pub verified_orders: usize,
}

impl FarmerTotals {
    pub fn order_count(&self) -> usize {
        self.order_ids.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderCashback {
    pub order_id: String,
    pub farmer_key: String,
    pub order_value: u64,
    pub farmer_verified_value: u64,
    pub cashback: u64,
    pub is_winner: bool,
}

/// Result of both passes. `orders` is index-aligned with the subset it was
/// computed from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EligibilityOutcome {
    pub farmers: BTreeMap<String, FarmerTotals>,
    pub orders: Vec<OrderCashback>,
}

impl EligibilityOutcome {
    pub fn evaluate(
        active: &[&OrderRecord],
        catalog: &ProductCatalog,
        rule: EligibilityRule,
    ) -> Self {
        let farmers = farmer_totals(active, catalog);
        let orders = active
            .iter()
            .map(|record| {
                let farmer_verified_value = farmers
                    .get(record.farmer_key())
                    .map(|totals| totals.verified_value)
                    .unwrap_or(0);
                let order_value = order_value(record, catalog);
                let cashback = order_cashback(record, farmer_verified_value, catalog, rule);

                OrderCashback {
                    order_id: record.order_id.clone(),
                    farmer_key: record.farmer_key().to_string(),
                    order_value,
                    farmer_verified_value,
                    cashback,
                    is_winner: cashback > 0,
                }
            })
            .collect();

        Self { farmers, orders }
    }

    pub fn farmer(&self, key: &str) -> Option<&FarmerTotals> {
        self.farmers.get(key)
    }

    pub fn winners(&self) -> BTreeSet<&str> {
        self.orders
            .iter()
            .filter(|order| order.is_winner)
            .map(|order| order.farmer_key.as_str())
            .collect()
    }

    pub fn total_cashback(&self) -> u64 {
        self.orders
            .iter()
            .map(|order| order.cashback)
            .fold(0, u64::saturating_add)
    }
}

/// Pass one: order value per farmer across the active subset.
pub fn farmer_totals(
    active: &[&OrderRecord],
    catalog: &ProductCatalog,
) -> BTreeMap<String, FarmerTotals> {
    let mut totals: BTreeMap<String, FarmerTotals> = BTreeMap::new();

    for record in active {
        let value = order_value(record, catalog);
        let entry = totals.entry(record.farmer_key().to_string()).or_default();
        entry.total_value = entry.total_value.saturating_add(value);
        if record.status().is_verified() {
            entry.verified_value = entry.verified_value.saturating_add(value);
            entry.verified_orders += 1;
        }
        entry.order_ids.push(record.order_id.clone());
    }

    totals
}

/// Pass two for a single order, given its farmer's verified total.
pub fn order_cashback(
    record: &OrderRecord,
    farmer_verified_value: u64,
    catalog: &ProductCatalog,
    rule: EligibilityRule,
) -> u64 {
    if !rule.qualifies(record.status().is_verified(), farmer_verified_value) {
        return 0;
    }

    potential_cashback(record, catalog)
}
