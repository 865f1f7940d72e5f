use crate::infra::Programme;
use cashback_insights::config::AppConfig;
use cashback_insights::error::AppError;
use cashback_insights::telemetry;
use cashback_insights::workflows::cashback::report::export;
use cashback_insights::workflows::cashback::{
    AcreageBucket, CashbackReport, FilterCriteria, OrderRecord,
};
use chrono::NaiveDate;
use clap::Args;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct SourceArgs {
    /// Order export CSV (overrides CASHBACK_ORDERS_CSV)
    #[arg(long)]
    pub(crate) orders: Option<PathBuf>,
    /// Product catalog JSON (overrides CASHBACK_CATALOG_JSON)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Cumulative verified value a farmer needs (overrides CASHBACK_THRESHOLD)
    #[arg(long)]
    pub(crate) threshold: Option<u64>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct FilterArgs {
    /// Case-insensitive search over order, farmer, mobile and retailer fields
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Earliest entry date (YYYY-MM-DD or DD-MM-YYYY)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) start_date: Option<NaiveDate>,
    /// Latest entry date (YYYY-MM-DD or DD-MM-YYYY)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) end_date: Option<NaiveDate>,
    #[arg(long)]
    pub(crate) district: Option<String>,
    /// Land acreage bucket: 0-2, 2-5, 5-10, 10-25 or 25+
    #[arg(long)]
    pub(crate) acreage: Option<AcreageBucket>,
    #[arg(long)]
    pub(crate) crop: Option<String>,
    #[arg(long)]
    pub(crate) product: Option<String>,
    /// Retailer name, matched exactly
    #[arg(long)]
    pub(crate) retailer: Option<String>,
}

impl FilterArgs {
    pub(crate) fn into_criteria(self) -> FilterCriteria {
        FilterCriteria {
            search: self.search,
            start_date: self.start_date,
            end_date: self.end_date,
            district: self.district,
            acreage: self.acreage,
            crop: self.crop,
            product: self.product,
            retailer: self.retailer,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    #[command(flatten)]
    pub(crate) source: SourceArgs,
    #[command(flatten)]
    pub(crate) filters: FilterArgs,
    /// Rows shown in each ranking
    #[arg(long, default_value_t = 10)]
    pub(crate) top: usize,
    /// List every active order with its cashback result
    #[arg(long)]
    pub(crate) list_orders: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    #[command(flatten)]
    pub(crate) source: SourceArgs,
    #[command(flatten)]
    pub(crate) filters: FilterArgs,
    /// Destination file; stdout when omitted
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

fn load_programme(source: SourceArgs) -> Result<Programme, AppError> {
    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let SourceArgs {
        orders,
        catalog,
        threshold,
    } = source;
    if orders.is_some() {
        config.programme.orders_csv = orders;
    }
    if catalog.is_some() {
        config.programme.catalog_json = catalog;
    }
    if let Some(threshold) = threshold {
        config.programme.cashback_threshold = threshold;
    }

    Programme::load(&config.programme)
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        source,
        filters,
        top,
        list_orders,
    } = args;

    let programme = load_programme(source)?;
    let dataset = programme.dataset()?;
    let criteria = filters.into_criteria();
    let active = dataset.select(&criteria);
    let report = CashbackReport::compute(&active, &programme.catalog, programme.rule);

    render_report(&report, &active, &programme, dataset.len(), top, list_orders);
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let ExportArgs {
        source,
        filters,
        output,
    } = args;

    let programme = load_programme(source)?;
    let dataset = programme.dataset()?;
    let criteria = filters.into_criteria();
    let active = dataset.select(&criteria);
    let report = CashbackReport::compute(&active, &programme.catalog, programme.rule);

    match output {
        Some(path) => {
            let file = File::create(&path)?;
            export::write_csv(BufWriter::new(file), &active, &report.eligibility)?;
            info!(path = %path.display(), orders = active.len(), "cashback export written");
        }
        None => {
            let stdout = io::stdout();
            export::write_csv(stdout.lock(), &active, &report.eligibility)?;
        }
    }

    Ok(())
}

pub(crate) fn render_report(
    report: &CashbackReport,
    active: &[&OrderRecord],
    programme: &Programme,
    dataset_orders: usize,
    top: usize,
    list_orders: bool,
) {
    let metrics = &report.metrics;

    println!("Cashback programme report");
    println!(
        "Orders in view: {} of {} | threshold {} verified per farmer",
        metrics.total_orders, dataset_orders, programme.rule.threshold
    );

    println!("\nKey metrics");
    println!("- Unique farmers: {}", metrics.unique_farmers);
    println!(
        "- Approval: {} verified, {} pending, {} rejected",
        metrics.verified, metrics.pending, metrics.rejected
    );
    println!("- Winners: {}", metrics.winners);
    println!("- Total cashback: ₹{}", metrics.total_cashback);
    println!("- Active retailers: {}", metrics.active_retailers);

    println!("\nProduct sales");
    for sales in &report.product_sales {
        println!(
            "- {}: {} units across {} orders, ₹{} cashback",
            sales.product, sales.units, sales.orders, sales.cashback
        );
    }

    println!("\nBudget tracking");
    for entry in &report.budget {
        println!(
            "- {} ({}): ₹{} of ₹{} consumed ({:.1}%), ₹{} remaining",
            entry.product,
            entry.pack_size,
            entry.consumed,
            entry.budget,
            entry.consumed_pct,
            entry.remaining
        );
    }

    let crops = report.top_crops(top);
    if crops.is_empty() {
        println!("\nTop crops: none");
    } else {
        println!("\nTop crops");
        for crop in &crops {
            println!("- {}: {}", crop.crop, crop.count);
        }
    }

    let districts = report.top_districts_by_farmers(top);
    if districts.is_empty() {
        println!("\nTop districts: none");
    } else {
        println!("\nTop districts by farmers");
        for district in &districts {
            println!(
                "- {}: {} farmers, {} winners, {} orders, ₹{} cashback",
                district.district,
                district.farmers,
                district.winners,
                district.orders,
                district.cashback
            );
        }
    }

    let winners = report.top_districts_by_winners(top);
    if !winners.is_empty() {
        println!("\nTop districts by winners");
        for district in &winners {
            println!("- {}: {} winners", district.district, district.winners);
        }
    }

    let retailers = report.top_retailers(top);
    if retailers.is_empty() {
        println!("\nRetailers: none");
    } else {
        println!("\nRetailer performance");
        for retailer in retailers {
            println!(
                "- {} ({}): {} orders, {} farmers, {} units, {:.1}% verified",
                retailer.name,
                retailer.rin,
                retailer.orders,
                retailer.farmers,
                retailer.total_units,
                retailer.verification_rate
            );
        }
    }

    if list_orders {
        println!("\nOrders");
        for (record, result) in active.iter().zip(report.eligibility.orders.iter()) {
            let flag = if result.is_winner { "winner" } else { "-" };
            println!(
                "- {} | {} | {} | {} | value ₹{} | farmer verified ₹{} | cashback ₹{} | {}",
                record.order_id,
                record.entry_date,
                record.farmer_name,
                record.approval_status,
                result.order_value,
                result.farmer_verified_value,
                result.cashback,
                flag
            );
        }
    }
}
