use super::super::domain::OrderRecord;
use super::super::eligibility::EligibilityOutcome;
use std::io::Write;

const EXPORT_HEADER: [&str; 13] = [
    "Order ID",
    "Date of Entry",
    "RIN",
    "Retailer Name",
    "Farmer Name",
    "Farmer Mobile",
    "District",
    "Crops Selected",
    "Approval Status",
    "Order Value",
    "Farmer Total Verified",
    "Cashback Amount",
    "Is Winner",
];

/// Writes the active subset, annotated with its cashback results, as CSV.
/// Fields containing commas, quotes or newlines are quoted.
pub fn write_csv<W: Write>(
    writer: W,
    active: &[&OrderRecord],
    outcome: &EligibilityOutcome,
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);

    csv_writer.write_record(EXPORT_HEADER)?;

    for (record, result) in active.iter().zip(outcome.orders.iter()) {
        let order_value = result.order_value.to_string();
        let farmer_verified = result.farmer_verified_value.to_string();
        let cashback = result.cashback.to_string();
        let winner = if result.is_winner { "Yes" } else { "No" };

        csv_writer.write_record([
            record.order_id.as_str(),
            record.entry_date.as_str(),
            record.rin.as_str(),
            record.retailer_name.as_str(),
            record.farmer_name.as_str(),
            record.farmer_mobile.as_str(),
            record.district.as_str(),
            record.crops_selected.as_str(),
            record.approval_status.as_str(),
            order_value.as_str(),
            farmer_verified.as_str(),
            cashback.as_str(),
            winner,
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn to_csv_string(
    active: &[&OrderRecord],
    outcome: &EligibilityOutcome,
) -> Result<String, csv::Error> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, active, outcome)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::cashback::domain::ProductSlot;
    use crate::workflows::cashback::{EligibilityRule, ProductCatalog};

    #[test]
    fn export_quotes_text_with_commas_and_flags_winners() {
        let mut winner = OrderRecord {
            order_id: "ORD-1".to_string(),
            entry_date: "05-01-2025".to_string(),
            rin: "RIN-1".to_string(),
            retailer_name: "Shah, Sons & Co".to_string(),
            farmer_name: "Ravi \"Bapu\" Patel".to_string(),
            farmer_mobile: "9000000001".to_string(),
            district: "Agra".to_string(),
            crops_selected: "Wheat, Potato".to_string(),
            approval_status: "Verified".to_string(),
            ..OrderRecord::default()
        };
        winner.products[0] = ProductSlot::new("YaraMila Complex", "5");
        let loser = OrderRecord {
            order_id: "ORD-2".to_string(),
            farmer_mobile: "9000000002".to_string(),
            approval_status: "Pending".to_string(),
            ..OrderRecord::default()
        };

        let records = [winner, loser];
        let active: Vec<&OrderRecord> = records.iter().collect();
        let outcome = EligibilityOutcome::evaluate(
            &active,
            &ProductCatalog::standard(),
            EligibilityRule::default(),
        );
        let csv = to_csv_string(&active, &outcome).expect("export succeeds");
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], EXPORT_HEADER.join(","));
        assert_eq!(
            lines[1],
            "ORD-1,05-01-2025,RIN-1,\"Shah, Sons & Co\",\"Ravi \"\"Bapu\"\" Patel\",9000000001,Agra,\"Wheat, Potato\",Verified,12000,12000,200,Yes"
        );
        assert_eq!(lines[2], "ORD-2,,,,,9000000002,,,Pending,0,0,0,No");
        assert_eq!(lines.len(), 3);
    }
}
