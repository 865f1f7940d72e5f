pub mod cashback;
pub mod ingest;
