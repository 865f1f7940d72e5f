use cashback_insights::workflows::cashback::{
    AcreageBucket, CashbackReport, CatalogEntry, EligibilityRule, FilterCriteria, OrderRecord,
    ProductCatalog, ProductSlot,
};
use cashback_insights::workflows::ingest::OrderImporter;

fn single_product_catalog() -> ProductCatalog {
    ProductCatalog::new(vec![CatalogEntry {
        name: "P1".to_string(),
        pack_size: "1kg".to_string(),
        unit_price: 100,
        unit_cashback: 10,
        budget: 1000,
    }])
    .expect("catalog builds")
}

fn order(id: &str, farmer: &str, status: &str, slots: &[(&str, &str)]) -> OrderRecord {
    let mut record = OrderRecord {
        order_id: id.to_string(),
        farmer_mobile: farmer.to_string(),
        approval_status: status.to_string(),
        rin: format!("RIN-{farmer}"),
        retailer_name: format!("Retailer {farmer}"),
        district: "Agra".to_string(),
        ..OrderRecord::default()
    };
    for (idx, (product, quantity)) in slots.iter().enumerate() {
        record.products[idx] = ProductSlot::new(*product, *quantity);
    }
    record
}

fn compute(records: &[OrderRecord], catalog: &ProductCatalog) -> CashbackReport {
    let active: Vec<&OrderRecord> = records.iter().collect();
    CashbackReport::compute(&active, catalog, EligibilityRule::default())
}

#[test]
fn farmer_crossing_threshold_earns_on_every_verified_order() {
    let catalog = single_product_catalog();
    let records = vec![
        order("O1", "F", "Verified", &[("P1", "60")]),
        order("O2", "F", "Verified", &[("P1", "50")]),
    ];

    let report = compute(&records, &catalog);

    assert_eq!(report.metrics.total_cashback, 1100);
    assert_eq!(report.metrics.winners, 1);
    let sales = report.product("P1").expect("P1 row");
    assert_eq!(sales.units, 110);
    assert_eq!(sales.cashback, 1100);
    assert_eq!(sales.orders, 2);

    let budget = &report.budget[0];
    assert_eq!(budget.consumed, 1100);
    assert_eq!(budget.remaining, -100);
    assert_eq!(budget.consumed_pct, 110.0);
    assert_eq!(budget.display_pct, 100.0);
}

#[test]
fn pending_orders_do_not_lift_a_farmer_over_the_threshold() {
    let catalog = single_product_catalog();
    let records = vec![
        order("O1", "G", "Verified", &[("P1", "80")]),
        order("O2", "G", "Pending", &[("P1", "80")]),
    ];

    let report = compute(&records, &catalog);

    assert_eq!(report.metrics.total_cashback, 0);
    assert_eq!(report.metrics.winners, 0);
    let sales = report.product("P1").expect("P1 row");
    assert_eq!(sales.units, 160);
    assert_eq!(sales.cashback, 0);
    let farmer = report.eligibility.farmer("G").expect("farmer totals");
    assert_eq!(farmer.total_value, 16_000);
    assert_eq!(farmer.verified_value, 8_000);
}

#[test]
fn threshold_is_judged_on_the_final_verified_total() {
    let catalog = single_product_catalog();
    let mut records = vec![
        order("O1", "H", "Verified", &[("P1", "60")]),
        order("O2", "H", "Verified", &[("P1", "39")]),
    ];
    let below = compute(&records, &catalog);
    assert_eq!(below.eligibility.farmer("H").map(|f| f.verified_value), Some(9_900));
    assert_eq!(below.metrics.total_cashback, 0);

    records.push(order("O3", "H", "Verified", &[("P1", "1")]));
    let crossed = compute(&records, &catalog);
    let cashbacks: Vec<u64> = crossed
        .eligibility
        .orders
        .iter()
        .map(|order| order.cashback)
        .collect();
    assert_eq!(cashbacks, vec![600, 390, 10]);
}

#[test]
fn unknown_products_are_neutral_and_embedded_cashback_wins() {
    let catalog = single_product_catalog();
    let records = vec![order(
        "O1",
        "K",
        "Verified",
        &[
            ("P1 Cashback Amount : ₹15", "100"),
            ("Mystery Mix Cashback Amount : ₹99", "50"),
        ],
    )];

    let report = compute(&records, &catalog);

    let result = &report.eligibility.orders[0];
    assert_eq!(result.order_value, 10_000);
    assert_eq!(result.cashback, 1500);
    assert_eq!(report.product("P1").map(|p| p.cashback), Some(1500));
    assert_eq!(report.product_sales.len(), 1);
}

#[test]
fn district_and_retailer_views_group_the_active_subset() {
    let catalog = single_product_catalog();
    let mut records = vec![
        order("O1", "A", "Verified", &[("P1", "120")]),
        order("O2", "A", "Verified", &[("P1", "1")]),
        order("O3", "B", "Pending", &[("P1", "5")]),
        order("O4", "C", "Rejected", &[("P1", "2"), ("P1", "3")]),
    ];
    records[2].rin = "RIN-A".to_string();
    records[3].district = String::new();

    let report = compute(&records, &catalog);

    let agra = report.district("Agra").expect("Agra row");
    assert_eq!(agra.farmers, 2);
    assert_eq!(agra.winners, 1);
    assert_eq!(agra.orders, 3);
    assert_eq!(agra.cashback, 1210);
    let unknown = report.district("Unknown").expect("Unknown row");
    assert_eq!(unknown.orders, 1);
    assert!(report.top_districts_by_farmers(10).iter().all(|d| d.district != "Unknown"));

    let retailer_ids: Vec<&str> = report.retailer_stats.iter().map(|r| r.rin.as_str()).collect();
    assert_eq!(retailer_ids, vec!["RIN-A", "RIN-C"]);
    let retailer = report.retailer("RIN-A").expect("retailer row");
    assert_eq!(retailer.orders, 3);
    assert_eq!(retailer.farmers, 2);
    assert_eq!(retailer.verified, 2);
    assert_eq!(retailer.total_units, 126);
    assert_eq!(retailer.verification_rate, 66.7);
    assert_eq!(report.retailer("RIN-C").map(|r| r.total_units), Some(5));
}

#[test]
fn filtered_out_retailers_disappear_from_the_report() {
    let catalog = single_product_catalog();
    let records = vec![
        order("O1", "A", "Verified", &[("P1", "1")]),
        order("O2", "B", "Verified", &[("P1", "1")]),
    ];
    let dataset = cashback_insights::workflows::cashback::OrderDataset::new(records);
    let criteria = FilterCriteria {
        retailer: Some("Retailer A".to_string()),
        ..FilterCriteria::default()
    };

    let report = dataset.report(&criteria, &catalog, EligibilityRule::default());

    assert_eq!(report.retailer_stats.len(), 1);
    assert!(report.retailer("RIN-B").is_none());
    assert_eq!(report.metrics.active_retailers, 1);
}

#[test]
fn repeated_computation_is_identical() {
    let csv = "Order ID,Date of Entry,RIN,Retailer Name,Farmer Name,Farmer Mobile,District,Land Acreage,Crops Selected,Approval Status,Product Name 1,Product Quantity 1,Product Name 2,Product Quantity 2\n\
ORD-1,01-02-2025,R1,Kisan Seva,Asha,9000000001,Agra,3,\"Wheat, Potato\",Verified,YaraMila Complex,4,YaraLiva Nitrabor,1\n\
ORD-2,03-02-2025,R2,Agro Mart,Bhola,9000000002,Mathura,12,Rice,Pending,YaraVita Bortrac,6,,\n\
ORD-3,05-02-2025,R1,Kisan Seva,Asha,9000000001,Agra,3,Wheat,Verified,\"YaraMila Complex\nCashback Amount : ₹45\",1,,\n";
    let dataset = OrderImporter::from_text(csv);
    let catalog = ProductCatalog::standard();
    let criteria = FilterCriteria::default();

    let first = dataset.report(&criteria, &catalog, EligibilityRule::default());
    let second = dataset.report(&criteria, &catalog, EligibilityRule::default());

    assert_eq!(first, second);
    assert_eq!(first.metrics.total_orders, 3);
    assert_eq!(first.metrics.winners, 1);
    // 4 x 2400 + 1600 + 2400 verified for Asha; 4 x 40 + 25 + 45 cashback
    assert_eq!(first.metrics.total_cashback, 230);
    let crops: Vec<(String, usize)> = first
        .crop_frequency
        .iter()
        .map(|entry| (entry.crop.clone(), entry.count))
        .collect();
    assert_eq!(
        crops,
        vec![
            ("Wheat".to_string(), 2),
            ("Potato".to_string(), 1),
            ("Rice".to_string(), 1)
        ]
    );
}

#[test]
fn acreage_filter_excludes_rows_without_acreage() {
    let mut with_land = order("O1", "A", "Verified", &[("P1", "1")]);
    with_land.land_acreage = "6".to_string();
    let without_land = order("O2", "B", "Verified", &[("P1", "1")]);
    let dataset =
        cashback_insights::workflows::cashback::OrderDataset::new(vec![with_land, without_land]);

    let criteria = FilterCriteria {
        acreage: Some(AcreageBucket::FiveToTen),
        ..FilterCriteria::default()
    };
    let active = dataset.select(&criteria);

    assert_eq!(active.len(), 1);
    assert_eq!(active[0].order_id, "O1");
}

#[test]
fn huge_quantities_saturate_order_values_and_totals() {
    let catalog = ProductCatalog::standard();
    let records = vec![order(
        "O1",
        "Z",
        "Verified",
        &[
            ("YaraMila Complex", "99999999999999999"),
            ("YaraMila Complex", "99999999999999999"),
        ],
    )];

    let report = compute(&records, &catalog);

    let result = &report.eligibility.orders[0];
    assert_eq!(result.order_value, u64::MAX);
    assert!(result.is_winner);
    assert_eq!(result.cashback, 7_999_999_999_999_999_920);
    assert_eq!(
        report.product("YaraMila Complex").map(|p| p.units),
        Some(199_999_999_999_999_998)
    );
    assert_eq!(report.budget[0].remaining, 75_000 - 7_999_999_999_999_999_920);
}

#[test]
fn unit_totals_saturate_across_slots() {
    let catalog = ProductCatalog::standard();
    let max = i64::MAX.to_string();
    let records = vec![order(
        "O1",
        "Z",
        "Verified",
        &[
            ("YaraMila Complex", max.as_str()),
            ("YaraMila Complex", max.as_str()),
            ("YaraMila Complex", max.as_str()),
        ],
    )];

    let report = compute(&records, &catalog);

    assert_eq!(report.retailer("RIN-Z").map(|r| r.total_units), Some(u64::MAX));
    assert_eq!(report.product("YaraMila Complex").map(|p| p.units), Some(u64::MAX));
    assert_eq!(report.metrics.total_cashback, u64::MAX);
    assert_eq!(report.budget[0].remaining, 75_000 - i64::MAX);
}

#[test]
fn retailers_with_equal_order_counts_keep_encounter_order() {
    let catalog = single_product_catalog();
    let records = vec![
        order("O1", "X", "Pending", &[("P1", "1")]),
        order("O2", "Y", "Pending", &[("P1", "1")]),
        order("O3", "Y", "Pending", &[("P1", "1")]),
        order("O4", "W", "Pending", &[("P1", "1")]),
    ];

    let report = compute(&records, &catalog);

    let retailer_ids: Vec<&str> = report.retailer_stats.iter().map(|r| r.rin.as_str()).collect();
    assert_eq!(retailer_ids, vec!["RIN-Y", "RIN-X", "RIN-W"]);
}

#[test]
fn zero_budget_reports_zero_percentages() {
    let catalog = ProductCatalog::new(vec![CatalogEntry {
        name: "P0".to_string(),
        pack_size: "1kg".to_string(),
        unit_price: 100,
        unit_cashback: 10,
        budget: 0,
    }])
    .expect("catalog builds");
    let records = vec![order("O1", "F", "Verified", &[("P0", "200")])];

    let report = compute(&records, &catalog);

    let budget = &report.budget[0];
    assert_eq!(budget.consumed, 2000);
    assert_eq!(budget.remaining, -2000);
    assert_eq!(budget.consumed_pct, 0.0);
    assert_eq!(budget.display_pct, 0.0);
    assert!(budget.consumed_pct.is_finite());
}
