use super::catalog::ProductCatalog;
use super::domain::OrderRecord;
use super::eligibility::EligibilityRule;
use super::filter::{FilterCriteria, FilterOptions};
use super::report::CashbackReport;

/// The full imported record set. A fresh import replaces it wholesale; it is
/// never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDataset {
    records: Vec<OrderRecord>,
}

impl OrderDataset {
    pub fn new(records: Vec<OrderRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn select(&self, criteria: &FilterCriteria) -> Vec<&OrderRecord> {
        criteria.select(&self.records)
    }

    /// Filter choices available across the whole dataset.
    pub fn filter_options(&self, catalog: &ProductCatalog) -> FilterOptions {
        let all: Vec<&OrderRecord> = self.records.iter().collect();
        FilterOptions::from_subset(&all, catalog)
    }

    pub fn report(
        &self,
        criteria: &FilterCriteria,
        catalog: &ProductCatalog,
        rule: EligibilityRule,
    ) -> CashbackReport {
        let active = self.select(criteria);
        CashbackReport::compute(&active, catalog, rule)
    }
}

impl From<Vec<OrderRecord>> for OrderDataset {
    fn from(records: Vec<OrderRecord>) -> Self {
        Self::new(records)
    }
}
