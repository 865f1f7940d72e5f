use super::super::catalog::ProductCatalog;
use super::super::domain::{OrderRecord, UNKNOWN_DISTRICT};
use super::super::eligibility::{EligibilityOutcome, EligibilityRule};
use super::super::filter::FilterOptions;
use super::aggregates;
use super::views::{
    BudgetEntry, CropFrequencyEntry, DistrictStatsEntry, KeyMetrics, ProductSalesEntry,
    RetailerStatsEntry,
};
use serde::Serialize;
use tracing::debug;

/// Everything the dashboard renders for one active subset. Built from scratch
/// on every call; nothing is carried over between computations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashbackReport {
    pub metrics: KeyMetrics,
    pub product_sales: Vec<ProductSalesEntry>,
    pub crop_frequency: Vec<CropFrequencyEntry>,
    pub district_stats: Vec<DistrictStatsEntry>,
    pub retailer_stats: Vec<RetailerStatsEntry>,
    pub budget: Vec<BudgetEntry>,
    pub filter_options: FilterOptions,
    #[serde(skip)]
    pub eligibility: EligibilityOutcome,
}

impl CashbackReport {
    pub fn compute(
        active: &[&OrderRecord],
        catalog: &ProductCatalog,
        rule: EligibilityRule,
    ) -> Self {
        let eligibility = EligibilityOutcome::evaluate(active, catalog, rule);
        let orders = &eligibility.orders;

        let metrics = aggregates::key_metrics(active, orders);
        let product_sales = aggregates::product_sales(active, orders, catalog);
        let budget = aggregates::budget_tracking(&product_sales, catalog);

        debug!(
            orders = metrics.total_orders,
            farmers = metrics.unique_farmers,
            winners = metrics.winners,
            cashback = metrics.total_cashback,
            threshold = rule.threshold,
            "computed cashback report"
        );

        Self {
            metrics,
            product_sales,
            crop_frequency: aggregates::crop_frequency(active),
            district_stats: aggregates::district_stats(active, orders),
            retailer_stats: aggregates::retailer_stats(active),
            budget,
            filter_options: FilterOptions::from_subset(active, catalog),
            eligibility,
        }
    }

    pub fn product(&self, name: &str) -> Option<&ProductSalesEntry> {
        self.product_sales.iter().find(|entry| entry.product == name)
    }

    pub fn district(&self, name: &str) -> Option<&DistrictStatsEntry> {
        self.district_stats.iter().find(|entry| entry.district == name)
    }

    pub fn retailer(&self, rin: &str) -> Option<&RetailerStatsEntry> {
        self.retailer_stats.iter().find(|entry| entry.rin == rin)
    }

    pub fn top_crops(&self, limit: usize) -> Vec<CropFrequencyEntry> {
        let mut crops = self.crop_frequency.clone();
        crops.sort_by(|a, b| b.count.cmp(&a.count));
        crops.truncate(limit);
        crops
    }

    /// Named districts ranked by distinct farmers.
    pub fn top_districts_by_farmers(&self, limit: usize) -> Vec<DistrictStatsEntry> {
        self.ranked_districts(limit, |entry| entry.farmers)
    }

    /// Named districts ranked by distinct winning farmers.
    pub fn top_districts_by_winners(&self, limit: usize) -> Vec<DistrictStatsEntry> {
        self.ranked_districts(limit, |entry| entry.winners)
    }

    pub fn top_retailers(&self, limit: usize) -> &[RetailerStatsEntry] {
        let end = limit.min(self.retailer_stats.len());
        &self.retailer_stats[..end]
    }

    fn ranked_districts<F>(&self, limit: usize, key: F) -> Vec<DistrictStatsEntry>
    where
        F: Fn(&DistrictStatsEntry) -> usize,
    {
        let mut districts: Vec<DistrictStatsEntry> = self
            .district_stats
            .iter()
            .filter(|entry| entry.district != UNKNOWN_DISTRICT)
            .cloned()
            .collect();
        districts.sort_by(|a, b| key(b).cmp(&key(a)));
        districts.truncate(limit);
        districts
    }
}
