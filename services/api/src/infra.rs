use cashback_insights::config::ProgrammeConfig;
use cashback_insights::error::AppError;
use cashback_insights::workflows::cashback::domain::parse_entry_date;
use cashback_insights::workflows::cashback::{EligibilityRule, OrderDataset, ProductCatalog};
use cashback_insights::workflows::ingest::OrderImporter;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) programme: Arc<Programme>,
}

/// Catalog, eligibility rule and (optionally) the order export loaded at
/// start-up. Shared read-only by every request.
#[derive(Debug, Clone)]
pub(crate) struct Programme {
    pub(crate) dataset: Option<OrderDataset>,
    pub(crate) catalog: ProductCatalog,
    pub(crate) rule: EligibilityRule,
}

impl Programme {
    pub(crate) fn load(config: &ProgrammeConfig) -> Result<Self, AppError> {
        let catalog = match &config.catalog_json {
            Some(path) => ProductCatalog::from_path(path)?,
            None => ProductCatalog::standard(),
        };

        let dataset = match &config.orders_csv {
            Some(path) => {
                let dataset = OrderImporter::from_path(path)?;
                info!(path = %path.display(), orders = dataset.len(), "order export loaded");
                Some(dataset)
            }
            None => None,
        };

        Ok(Self {
            dataset,
            catalog,
            rule: EligibilityRule::new(config.cashback_threshold),
        })
    }

    pub(crate) fn dataset(&self) -> Result<&OrderDataset, AppError> {
        self.dataset.as_ref().ok_or(AppError::DatasetUnavailable)
    }
}

/// Accepts ISO (`2025-01-31`) and day-month-year (`31-01-2025`) dates.
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    parse_entry_date(raw)
        .ok_or_else(|| format!("failed to parse '{raw}' as YYYY-MM-DD or DD-MM-YYYY"))
}

#[cfg(test)]
pub(crate) fn test_state(dataset: Option<OrderDataset>) -> AppState {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let recorder = PrometheusBuilder::new().build_recorder();
    AppState {
        readiness: Arc::new(AtomicBool::new(true)),
        metrics: Arc::new(recorder.handle()),
        programme: Arc::new(Programme {
            dataset,
            catalog: ProductCatalog::standard(),
            rule: EligibilityRule::default(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parse_date_accepts_both_orders() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 9).expect("valid date");
        assert_eq!(parse_date("2025-03-09"), Ok(expected));
        assert_eq!(parse_date("09-03-2025"), Ok(expected));
        assert!(parse_date("March").is_err());
    }

    #[test]
    fn programme_without_paths_uses_standard_catalog() {
        let config = ProgrammeConfig {
            orders_csv: None,
            catalog_json: None,
            cashback_threshold: 12_500,
        };
        let programme = Programme::load(&config).expect("programme loads");
        assert!(programme.dataset.is_none());
        assert_eq!(programme.catalog, ProductCatalog::standard());
        assert_eq!(programme.rule.threshold, 12_500);
        assert!(matches!(
            programme.dataset(),
            Err(AppError::DatasetUnavailable)
        ));
    }

    #[test]
    fn programme_reports_missing_order_file() {
        let config = ProgrammeConfig {
            orders_csv: Some(PathBuf::from("./missing-orders.csv")),
            catalog_json: None,
            cashback_threshold: 10_000,
        };
        let error = Programme::load(&config).expect_err("missing file");
        assert!(matches!(error, AppError::Import(_)));
    }
}
