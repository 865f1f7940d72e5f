mod aggregates;
pub mod export;
mod summary;
pub mod views;

pub use summary::CashbackReport;
