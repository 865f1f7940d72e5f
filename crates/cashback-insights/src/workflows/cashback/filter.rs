use super::catalog::ProductCatalog;
use super::domain::{parse_entry_date, OrderRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Land holding bins offered by the dashboard. Bounds are inclusive and the
/// last bin is open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AcreageBucket {
    #[serde(rename = "0-2")]
    UpToTwo,
    #[serde(rename = "2-5")]
    TwoToFive,
    #[serde(rename = "5-10")]
    FiveToTen,
    #[serde(rename = "10-25")]
    TenToTwentyFive,
    #[serde(rename = "25+")]
    AboveTwentyFive,
}

impl AcreageBucket {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::UpToTwo,
            Self::TwoToFive,
            Self::FiveToTen,
            Self::TenToTwentyFive,
            Self::AboveTwentyFive,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::UpToTwo => "0-2",
            Self::TwoToFive => "2-5",
            Self::FiveToTen => "5-10",
            Self::TenToTwentyFive => "10-25",
            Self::AboveTwentyFive => "25+",
        }
    }

    const fn bounds(self) -> (f64, Option<f64>) {
        match self {
            Self::UpToTwo => (0.0, Some(2.0)),
            Self::TwoToFive => (2.0, Some(5.0)),
            Self::FiveToTen => (5.0, Some(10.0)),
            Self::TenToTwentyFive => (10.0, Some(25.0)),
            Self::AboveTwentyFive => (25.0, None),
        }
    }

    pub fn contains(self, acreage: f64) -> bool {
        let (min, max) = self.bounds();
        acreage >= min && max.map_or(true, |max| acreage <= max)
    }
}

impl fmt::Display for AcreageBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AcreageBucket {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ordered()
            .into_iter()
            .find(|bucket| bucket.label() == trimmed)
            .ok_or_else(|| {
                format!("unknown acreage bucket '{trimmed}' (expected 0-2, 2-5, 5-10, 10-25 or 25+)")
            })
    }
}

/// User-selected restrictions. Every field is optional and `None` means no
/// restriction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub search: Option<String>,
    #[serde(deserialize_with = "deserialize_optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(deserialize_with = "deserialize_optional_date")]
    pub end_date: Option<NaiveDate>,
    pub district: Option<String>,
    pub acreage: Option<AcreageBucket>,
    pub crop: Option<String>,
    pub product: Option<String>,
    pub retailer: Option<String>,
}

/// Blank strings read as no bound; dates use the same forms as entry dates.
fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.filter(|value| !value.trim().is_empty())
        .map(|value| {
            parse_entry_date(&value).ok_or_else(|| {
                serde::de::Error::custom(format!(
                    "failed to parse '{value}' as YYYY-MM-DD or DD-MM-YYYY"
                ))
            })
        })
        .transpose()
}

impl FilterCriteria {
    pub fn is_unrestricted(&self) -> bool {
        self.normalized() == FilterCriteria::default()
    }

    /// Blank text criteria behave like absent ones.
    fn normalized(&self) -> FilterCriteria {
        fn text(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        }

        FilterCriteria {
            search: text(&self.search).map(|term| term.to_lowercase()),
            start_date: self.start_date,
            end_date: self.end_date,
            district: text(&self.district),
            acreage: self.acreage,
            crop: text(&self.crop),
            product: text(&self.product),
            retailer: text(&self.retailer),
        }
    }

    pub fn matches(&self, record: &OrderRecord) -> bool {
        self.normalized().matches_normalized(record)
    }

    /// Active subset of `records`, in input order.
    pub fn select<'a>(&self, records: &'a [OrderRecord]) -> Vec<&'a OrderRecord> {
        let criteria = self.normalized();
        records
            .iter()
            .filter(|record| criteria.matches_normalized(record))
            .collect()
    }

    fn matches_normalized(&self, record: &OrderRecord) -> bool {
        if let Some(term) = &self.search {
            let searchable = [
                record.farmer_name.as_str(),
                record.farmer_mobile.as_str(),
                record.retailer_name.as_str(),
                record.order_id.as_str(),
                record.rin.as_str(),
            ]
            .join(" ")
            .to_lowercase();
            if !searchable.contains(term.as_str()) {
                return false;
            }
        }

        if self.start_date.is_some() || self.end_date.is_some() {
            if let Some(entry_date) = record.entry_date() {
                if self.start_date.is_some_and(|start| entry_date < start) {
                    return false;
                }
                if self.end_date.is_some_and(|end| entry_date > end) {
                    return false;
                }
            }
        }

        if let Some(district) = &self.district {
            if record.district.trim() != district {
                return false;
            }
        }

        if let Some(bucket) = self.acreage {
            if !bucket.contains(record.land_acreage()) {
                return false;
            }
        }

        if let Some(crop) = &self.crop {
            if !record.crops_selected.contains(crop.as_str()) {
                return false;
            }
        }

        if let Some(product) = &self.product {
            let ordered = record
                .products
                .iter()
                .any(|slot| slot.decoded().name == *product);
            if !ordered {
                return false;
            }
        }

        if let Some(retailer) = &self.retailer {
            if record.retailer_name.trim() != retailer {
                return false;
            }
        }

        true
    }
}

/// Distinct values of each filterable field in a subset, sorted, so a UI can
/// decide which choices remain selectable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub districts: Vec<String>,
    pub crops: Vec<String>,
    pub products: Vec<String>,
    pub retailers: Vec<String>,
}

impl FilterOptions {
    pub fn from_subset(active: &[&OrderRecord], catalog: &ProductCatalog) -> Self {
        let mut districts = BTreeSet::new();
        let mut crops = BTreeSet::new();
        let mut products = BTreeSet::new();
        let mut retailers = BTreeSet::new();

        for record in active {
            let district = record.district.trim();
            if !district.is_empty() {
                districts.insert(district.to_string());
            }
            let retailer = record.retailer_name.trim();
            if !retailer.is_empty() {
                retailers.insert(retailer.to_string());
            }
            crops.extend(record.crops().map(str::to_string));
            for slot in &record.products {
                let decoded = slot.decoded();
                if catalog.contains(&decoded.name) {
                    products.insert(decoded.name);
                }
            }
        }

        Self {
            districts: districts.into_iter().collect(),
            crops: crops.into_iter().collect(),
            products: products.into_iter().collect(),
            retailers: retailers.into_iter().collect(),
        }
    }
}
