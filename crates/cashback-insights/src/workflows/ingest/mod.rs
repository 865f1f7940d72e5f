mod mapping;
pub mod parser;

use crate::workflows::cashback::OrderDataset;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

pub use parser::{parse_table, ParsedTable, RowView};

#[derive(Debug, thiserror::Error)]
pub enum OrderImportError {
    #[error("failed to read order export: {0}")]
    Io(#[from] std::io::Error),
    #[error("order export is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub struct OrderImporter;

impl OrderImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<OrderDataset, OrderImportError> {
        let file = std::fs::File::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "reading order export");
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<OrderDataset, OrderImportError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let text = String::from_utf8(bytes)?;
        Ok(Self::from_text(&text))
    }

    /// Parsing never fails: malformed rows are dropped and counted.
    pub fn from_text(text: &str) -> OrderDataset {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let table = parse_table(text);

        let missing = mapping::missing_headers(table.headers());
        if !table.headers().is_empty() && !missing.is_empty() {
            warn!(?missing, "order export lacks expected columns; treating them as empty");
        }
        if table.discarded() > 0 {
            debug!(discarded = table.discarded(), "dropped malformed order rows");
        }

        let records = table
            .rows()
            .map(|row| mapping::order_from_row(&row))
            .collect::<Vec<_>>();
        info!(orders = records.len(), "imported order export");

        OrderDataset::new(records)
    }
}
