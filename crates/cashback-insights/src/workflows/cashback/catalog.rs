use super::decoder::DecodedProduct;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(default)]
    pub pack_size: String,
    pub unit_price: u64,
    pub unit_cashback: u64,
    pub budget: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read product catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid product catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("product '{0}' is listed more than once")]
    DuplicateProduct(String),
    #[error("catalog entries must have a product name")]
    MissingName,
}

/// Static table of programme products. Declaration order is kept and drives
/// the order of product-level report rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCatalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

impl ProductCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(CatalogError::MissingName);
            }
            if index.insert(entry.name.clone(), position).is_some() {
                return Err(CatalogError::DuplicateProduct(entry.name.clone()));
            }
        }

        Ok(Self { entries, index })
    }

    pub fn standard() -> Self {
        const PRODUCTS: &[(&str, &str, u64, u64, u64)] = &[
            // name, pack size, unit price, cashback per unit, programme budget
            ("YaraMila Complex", "25kg", 2400, 40, 75_000),
            ("YaraLiva Nitrabor", "25kg", 1600, 25, 50_000),
            ("YaraVita Seniphos", "500ml", 850, 20, 35_000),
            ("YaraVita Bortrac", "250ml", 500, 10, 15_000),
            ("YaraVita Zintrac 700", "250ml", 450, 10, 25_000),
        ];

        let entries = PRODUCTS
            .iter()
            .map(|(name, pack_size, unit_price, unit_cashback, budget)| CatalogEntry {
                name: (*name).to_string(),
                pack_size: (*pack_size).to_string(),
                unit_price: *unit_price,
                unit_cashback: *unit_cashback,
                budget: *budget,
            })
            .collect::<Vec<_>>();

        Self::new(entries).expect("standard product names are unique and non-empty")
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path.as_ref())?;
        let catalog = Self::from_json_reader(file)?;
        info!(
            path = %path.as_ref().display(),
            products = catalog.len(),
            "loaded product catalog"
        );
        Ok(catalog)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> = serde_json::from_reader(reader)?;
        Self::new(entries)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.index.get(name).map(|position| &self.entries[*position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Per-unit cashback for a decoded cell. Embedded amounts win over the
    /// catalog rate; products outside the catalog never earn cashback.
    pub fn unit_cashback(&self, product: &DecodedProduct) -> u64 {
        match self.get(&product.name) {
            Some(_) if product.embedded_cashback > 0 => product.embedded_cashback,
            Some(entry) => entry.unit_cashback,
            None => 0,
        }
    }
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
