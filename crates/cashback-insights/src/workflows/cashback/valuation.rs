use super::catalog::ProductCatalog;
use super::domain::{OrderRecord, ProductSlot};

/// Monetary value of one slot: catalog unit price times quantity, zero for
/// products the catalog does not know.
pub fn slot_value(slot: &ProductSlot, catalog: &ProductCatalog) -> u64 {
    let decoded = slot.decoded();
    catalog
        .get(&decoded.name)
        .map(|entry| entry.unit_price.saturating_mul(slot.quantity()))
        .unwrap_or(0)
}

/// Cashback one slot would earn if its order qualifies.
pub fn slot_cashback(slot: &ProductSlot, catalog: &ProductCatalog) -> u64 {
    let decoded = slot.decoded();
    catalog
        .unit_cashback(&decoded)
        .saturating_mul(slot.quantity())
}

/// Slot values summed, saturating at `u64::MAX`.
pub fn order_value(record: &OrderRecord, catalog: &ProductCatalog) -> u64 {
    record
        .products
        .iter()
        .map(|slot| slot_value(slot, catalog))
        .fold(0, u64::saturating_add)
}

/// Sum of [`slot_cashback`] over every slot, ignoring eligibility.
pub fn potential_cashback(record: &OrderRecord, catalog: &ProductCatalog) -> u64 {
    record
        .products
        .iter()
        .map(|slot| slot_cashback(slot, catalog))
        .fold(0, u64::saturating_add)
}
