use super::super::catalog::ProductCatalog;
use super::super::domain::{ApprovalStatus, OrderRecord};
use super::super::eligibility::OrderCashback;
use super::views::{
    percentage, BudgetEntry, CropFrequencyEntry, DistrictStatsEntry, KeyMetrics,
    ProductSalesEntry, RetailerStatsEntry,
};
use std::collections::{HashMap, HashSet};

/// Pairs every active record with its pass-two result.
fn paired<'a>(
    active: &'a [&'a OrderRecord],
    orders: &'a [OrderCashback],
) -> impl Iterator<Item = (&'a OrderRecord, &'a OrderCashback)> {
    debug_assert_eq!(active.len(), orders.len());
    active.iter().copied().zip(orders.iter())
}

pub(crate) fn key_metrics(active: &[&OrderRecord], orders: &[OrderCashback]) -> KeyMetrics {
    let mut metrics = KeyMetrics {
        total_orders: active.len(),
        ..KeyMetrics::default()
    };
    let mut farmers = HashSet::new();
    let mut winners = HashSet::new();
    let mut retailers = HashSet::new();

    for (record, result) in paired(active, orders) {
        farmers.insert(record.farmer_key());
        retailers.insert(record.rin.trim());
        match record.status() {
            ApprovalStatus::Pending => metrics.pending += 1,
            ApprovalStatus::Verified => metrics.verified += 1,
            ApprovalStatus::Rejected => metrics.rejected += 1,
            ApprovalStatus::Other(_) => {}
        }
        if result.is_winner {
            winners.insert(record.farmer_key());
            metrics.total_cashback = metrics.total_cashback.saturating_add(result.cashback);
        }
    }

    metrics.unique_farmers = farmers.len();
    metrics.winners = winners.len();
    metrics.active_retailers = retailers.len();
    metrics
}

/// One row per catalog product, in catalog order. Units and slot counts
/// accumulate for every order; cashback only for winning orders.
pub(crate) fn product_sales(
    active: &[&OrderRecord],
    orders: &[OrderCashback],
    catalog: &ProductCatalog,
) -> Vec<ProductSalesEntry> {
    let mut sales: Vec<ProductSalesEntry> = catalog
        .entries()
        .iter()
        .map(|entry| ProductSalesEntry {
            product: entry.name.clone(),
            ..ProductSalesEntry::default()
        })
        .collect();
    let positions: HashMap<&str, usize> = catalog
        .entries()
        .iter()
        .enumerate()
        .map(|(position, entry)| (entry.name.as_str(), position))
        .collect();

    for (record, result) in paired(active, orders) {
        for slot in record.products.iter().filter(|slot| !slot.is_empty()) {
            let decoded = slot.decoded();
            let Some(position) = positions.get(decoded.name.as_str()) else {
                continue;
            };
            let quantity = slot.quantity();
            let entry = &mut sales[*position];
            entry.units = entry.units.saturating_add(quantity);
            entry.orders += 1;
            if result.is_winner {
                let cashback = catalog.unit_cashback(&decoded).saturating_mul(quantity);
                entry.cashback = entry.cashback.saturating_add(cashback);
            }
        }
    }

    sales
}

/// Crop token counts in first-seen order.
pub(crate) fn crop_frequency(active: &[&OrderRecord]) -> Vec<CropFrequencyEntry> {
    let mut counts: Vec<CropFrequencyEntry> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for record in active {
        for crop in record.crops() {
            match positions.get(crop) {
                Some(position) => counts[*position].count += 1,
                None => {
                    positions.insert(crop, counts.len());
                    counts.push(CropFrequencyEntry {
                        crop: crop.to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    counts
}

#[derive(Default)]
struct DistrictAccumulator<'a> {
    farmers: HashSet<&'a str>,
    winners: HashSet<&'a str>,
    orders: usize,
    cashback: u64,
}

/// District rows in first-seen order; blank districts group under `Unknown`.
pub(crate) fn district_stats(
    active: &[&OrderRecord],
    orders: &[OrderCashback],
) -> Vec<DistrictStatsEntry> {
    let mut order_of_appearance: Vec<&str> = Vec::new();
    let mut districts: HashMap<&str, DistrictAccumulator<'_>> = HashMap::new();

    for (record, result) in paired(active, orders) {
        let district = record.district_or_unknown();
        let stats = districts.entry(district).or_insert_with(|| {
            order_of_appearance.push(district);
            DistrictAccumulator::default()
        });

        stats.farmers.insert(record.farmer_key());
        stats.orders += 1;
        if result.is_winner {
            stats.winners.insert(record.farmer_key());
            stats.cashback = stats.cashback.saturating_add(result.cashback);
        }
    }

    order_of_appearance
        .into_iter()
        .filter_map(|district| {
            districts.get(district).map(|stats| DistrictStatsEntry {
                district: district.to_string(),
                farmers: stats.farmers.len(),
                winners: stats.winners.len(),
                orders: stats.orders,
                cashback: stats.cashback,
            })
        })
        .collect()
}

struct RetailerAccumulator<'a> {
    name: &'a str,
    orders: usize,
    farmers: HashSet<&'a str>,
    verified: usize,
    total_units: u64,
}

/// Retailers by descending order count; ties keep first-seen order.
pub(crate) fn retailer_stats(active: &[&OrderRecord]) -> Vec<RetailerStatsEntry> {
    let mut order_of_appearance: Vec<&str> = Vec::new();
    let mut retailers: HashMap<&str, RetailerAccumulator<'_>> = HashMap::new();

    for record in active {
        let rin = record.rin.trim();
        let stats = retailers.entry(rin).or_insert_with(|| {
            order_of_appearance.push(rin);
            RetailerAccumulator {
                name: record.retailer_name.trim(),
                orders: 0,
                farmers: HashSet::new(),
                verified: 0,
                total_units: 0,
            }
        });

        stats.orders += 1;
        stats.farmers.insert(record.farmer_key());
        if record.status().is_verified() {
            stats.verified += 1;
        }
        stats.total_units = stats.total_units.saturating_add(record.total_units());
    }

    let mut rows: Vec<RetailerStatsEntry> = order_of_appearance
        .into_iter()
        .filter_map(|rin| {
            retailers.get(rin).map(|stats| RetailerStatsEntry {
                rin: rin.to_string(),
                name: stats.name.to_string(),
                orders: stats.orders,
                farmers: stats.farmers.len(),
                verified: stats.verified,
                total_units: stats.total_units,
                verification_rate: percentage(stats.verified as u64, stats.orders as u64),
            })
        })
        .collect();

    rows.sort_by(|a, b| b.orders.cmp(&a.orders));
    rows
}

fn signed(amount: u64) -> i64 {
    i64::try_from(amount).unwrap_or(i64::MAX)
}

/// Budget consumption derived from product sales.
pub(crate) fn budget_tracking(
    sales: &[ProductSalesEntry],
    catalog: &ProductCatalog,
) -> Vec<BudgetEntry> {
    catalog
        .entries()
        .iter()
        .map(|entry| {
            let (consumed, units) = sales
                .iter()
                .find(|row| row.product == entry.name)
                .map(|row| (row.cashback, row.units))
                .unwrap_or((0, 0));
            let consumed_pct = percentage(consumed, entry.budget);

            BudgetEntry {
                product: entry.name.clone(),
                pack_size: entry.pack_size.clone(),
                budget: entry.budget,
                consumed,
                remaining: signed(entry.budget).saturating_sub(signed(consumed)),
                units,
                consumed_pct,
                display_pct: consumed_pct.min(100.0),
            }
        })
        .collect()
}
