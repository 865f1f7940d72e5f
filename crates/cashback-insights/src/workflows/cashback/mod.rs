mod catalog;
mod dataset;
pub mod decoder;
pub mod domain;
pub mod eligibility;
pub mod filter;
pub mod report;
pub mod valuation;

pub use catalog::{CatalogEntry, CatalogError, ProductCatalog};
pub use dataset::OrderDataset;
pub use decoder::{decode_product_field, DecodedProduct};
pub use domain::{ApprovalStatus, OrderRecord, ProductSlot, PRODUCT_SLOTS, UNKNOWN_DISTRICT};
pub use eligibility::{
    EligibilityOutcome, EligibilityRule, FarmerTotals, OrderCashback, DEFAULT_CASHBACK_THRESHOLD,
};
pub use filter::{AcreageBucket, FilterCriteria, FilterOptions};
pub use report::CashbackReport;
