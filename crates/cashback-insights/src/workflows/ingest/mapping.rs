use super::parser::RowView;
use crate::workflows::cashback::{OrderRecord, ProductSlot, PRODUCT_SLOTS};

pub(crate) const ORDER_ID: &str = "Order ID";
pub(crate) const ENTRY_DATE: &str = "Date of Entry";
pub(crate) const RIN: &str = "RIN";
pub(crate) const RETAILER_NAME: &str = "Retailer Name";
pub(crate) const FARMER_NAME: &str = "Farmer Name";
pub(crate) const FARMER_MOBILE: &str = "Farmer Mobile";
pub(crate) const DISTRICT: &str = "District";
pub(crate) const LAND_ACREAGE: &str = "Land Acreage";
pub(crate) const CROPS_SELECTED: &str = "Crops Selected";
pub(crate) const APPROVAL_STATUS: &str = "Approval Status";

pub(crate) fn order_from_row(row: &RowView<'_>) -> OrderRecord {
    let products: [ProductSlot; PRODUCT_SLOTS] = std::array::from_fn(|idx| {
        let slot = idx + 1;
        ProductSlot::new(
            row.get(&format!("Product Name {slot}")),
            row.get(&format!("Product Quantity {slot}")),
        )
    });

    OrderRecord {
        order_id: row.get(ORDER_ID).to_string(),
        entry_date: row.get(ENTRY_DATE).to_string(),
        rin: row.get(RIN).to_string(),
        retailer_name: row.get(RETAILER_NAME).to_string(),
        farmer_name: row.get(FARMER_NAME).to_string(),
        farmer_mobile: row.get(FARMER_MOBILE).to_string(),
        district: row.get(DISTRICT).to_string(),
        land_acreage: row.get(LAND_ACREAGE).to_string(),
        crops_selected: row.get(CROPS_SELECTED).to_string(),
        approval_status: row.get(APPROVAL_STATUS).to_string(),
        products,
    }
}

/// Headers the importer reads but the file does not provide.
pub(crate) fn missing_headers(headers: &[String]) -> Vec<String> {
    let mut expected: Vec<String> = [
        ORDER_ID,
        ENTRY_DATE,
        RIN,
        RETAILER_NAME,
        FARMER_NAME,
        FARMER_MOBILE,
        DISTRICT,
        LAND_ACREAGE,
        CROPS_SELECTED,
        APPROVAL_STATUS,
    ]
    .iter()
    .map(|header| header.to_string())
    .collect();
    for slot in 1..=PRODUCT_SLOTS {
        expected.push(format!("Product Name {slot}"));
        expected.push(format!("Product Quantity {slot}"));
    }

    expected
        .into_iter()
        .filter(|header| !headers.contains(header))
        .collect()
}
