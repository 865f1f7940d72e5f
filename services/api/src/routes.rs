use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use cashback_insights::error::AppError;
use cashback_insights::workflows::cashback::report::export;
use cashback_insights::workflows::cashback::report::views::{
    CropFrequencyEntry, DistrictStatsEntry, RetailerStatsEntry,
};
use cashback_insights::workflows::cashback::{
    CashbackReport, FilterCriteria, OrderCashback, OrderDataset,
};
use cashback_insights::workflows::ingest::OrderImporter;
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::borrow::Cow;

const DEFAULT_TOP: usize = 10;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CashbackReportRequest {
    /// Raw order export; falls back to the dataset loaded at start-up.
    #[serde(default)]
    pub(crate) orders_csv: Option<String>,
    #[serde(flatten)]
    pub(crate) filters: FilterCriteria,
    #[serde(default)]
    pub(crate) include_orders: bool,
    #[serde(default)]
    pub(crate) top: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CashbackExportRequest {
    #[serde(default)]
    pub(crate) orders_csv: Option<String>,
    #[serde(flatten)]
    pub(crate) filters: FilterCriteria,
}

#[derive(Debug, Serialize)]
pub(crate) struct CashbackReportResponse {
    pub(crate) data_source: DataSource,
    pub(crate) threshold: u64,
    pub(crate) dataset_orders: usize,
    #[serde(flatten)]
    pub(crate) report: CashbackReport,
    pub(crate) top_crops: Vec<CropFrequencyEntry>,
    pub(crate) top_districts_by_farmers: Vec<DistrictStatsEntry>,
    pub(crate) top_districts_by_winners: Vec<DistrictStatsEntry>,
    pub(crate) top_retailers: Vec<RetailerStatsEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) orders: Option<Vec<OrderCashback>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum DataSource {
    Inline,
    Configured,
}

pub(crate) fn with_application_routes() -> axum::Router {
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/cashback/report",
            axum::routing::post(cashback_report_endpoint),
        )
        .route(
            "/api/v1/cashback/export",
            axum::routing::post(cashback_export_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn resolve_dataset<'a>(
    state: &'a AppState,
    orders_csv: Option<String>,
) -> Result<(Cow<'a, OrderDataset>, DataSource), AppError> {
    match orders_csv {
        Some(csv) => Ok((
            Cow::Owned(OrderImporter::from_text(&csv)),
            DataSource::Inline,
        )),
        None => Ok((
            Cow::Borrowed(state.programme.dataset()?),
            DataSource::Configured,
        )),
    }
}

pub(crate) async fn cashback_report_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<CashbackReportRequest>,
) -> Result<Json<CashbackReportResponse>, AppError> {
    let CashbackReportRequest {
        orders_csv,
        filters,
        include_orders,
        top,
    } = payload;

    let (dataset, data_source) = resolve_dataset(&state, orders_csv)?;
    let programme = &state.programme;
    let report = dataset.report(&filters, &programme.catalog, programme.rule);

    let top = top.unwrap_or(DEFAULT_TOP);
    let orders = include_orders.then(|| report.eligibility.orders.clone());

    Ok(Json(CashbackReportResponse {
        data_source,
        threshold: programme.rule.threshold,
        dataset_orders: dataset.len(),
        top_crops: report.top_crops(top),
        top_districts_by_farmers: report.top_districts_by_farmers(top),
        top_districts_by_winners: report.top_districts_by_winners(top),
        top_retailers: report.top_retailers(top).to_vec(),
        orders,
        report,
    }))
}

pub(crate) async fn cashback_export_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<CashbackExportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let CashbackExportRequest {
        orders_csv,
        filters,
    } = payload;

    let (dataset, _) = resolve_dataset(&state, orders_csv)?;
    let programme = &state.programme;
    let active = dataset.select(&filters);
    let report = CashbackReport::compute(&active, &programme.catalog, programme.rule);
    let body = export::to_csv_string(&active, &report.eligibility)?;

    let filename = format!(
        "attachment; filename=\"cashback_report_{}.csv\"",
        Local::now().date_naive()
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, filename),
        ],
        body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::test_state;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    const ORDERS: &str = "Order ID,Date of Entry,RIN,Retailer Name,Farmer Name,Farmer Mobile,District,Land Acreage,Crops Selected,Approval Status,Product Name 1,Product Quantity 1\n\
ORD-1,01-02-2025,R1,Kisan Seva,Asha,9000000001,Agra,3,Wheat,Verified,YaraMila Complex,5\n\
ORD-2,10-02-2025,R2,Agro Mart,Bhola,9000000002,Mathura,12,Rice,Pending,YaraLiva Nitrabor,2\n";

    fn configured_state() -> AppState {
        test_state(Some(OrderImporter::from_text(ORDERS)))
    }

    #[tokio::test]
    async fn report_endpoint_uses_configured_dataset() {
        let Json(body) = cashback_report_endpoint(
            Extension(configured_state()),
            Json(CashbackReportRequest::default()),
        )
        .await
        .expect("report builds");

        assert_eq!(body.data_source, DataSource::Configured);
        assert_eq!(body.dataset_orders, 2);
        assert_eq!(body.report.metrics.total_orders, 2);
        assert_eq!(body.report.metrics.winners, 1);
        assert_eq!(body.report.metrics.total_cashback, 200);
        assert_eq!(body.report.product_sales.len(), 5);
        assert!(body.orders.is_none());
    }

    #[tokio::test]
    async fn report_endpoint_applies_inline_csv_and_filters() {
        let request = CashbackReportRequest {
            orders_csv: Some(ORDERS.to_string()),
            filters: FilterCriteria {
                district: Some("Mathura".to_string()),
                ..FilterCriteria::default()
            },
            include_orders: true,
            top: Some(1),
        };

        let Json(body) = cashback_report_endpoint(Extension(test_state(None)), Json(request))
            .await
            .expect("report builds");

        assert_eq!(body.data_source, DataSource::Inline);
        assert_eq!(body.report.metrics.total_orders, 1);
        assert_eq!(body.report.metrics.pending, 1);
        let orders = body.orders.expect("orders returned");
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].order_id, "ORD-2");
        assert!(!orders[0].is_winner);
        assert_eq!(body.top_retailers.len(), 1);
    }

    #[tokio::test]
    async fn report_endpoint_without_data_is_a_bad_request() {
        let result = cashback_report_endpoint(
            Extension(test_state(None)),
            Json(CashbackReportRequest::default()),
        )
        .await;

        let error = result.expect_err("no dataset");
        assert!(matches!(error, AppError::DatasetUnavailable));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn export_route_returns_csv_attachment() {
        let app = with_application_routes().layer(Extension(configured_state()));
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/cashback/export")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"start_date":"2025-02-05"}"#))
            .expect("request builds");

        let response = app.oneshot(request).await.expect("route responds");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let text = String::from_utf8(bytes.to_vec()).expect("utf-8 body");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Order ID,Date of Entry,RIN"));
        assert!(lines[1].starts_with("ORD-2,10-02-2025,R2"));
        assert!(lines[1].ends_with(",3200,0,0,No"));
    }

    #[tokio::test]
    async fn readiness_route_reports_ready_state() {
        let app = with_application_routes().layer(Extension(test_state(None)));
        let request = Request::builder()
            .uri("/ready")
            .body(Body::empty())
            .expect("request builds");

        let response = app.oneshot(request).await.expect("route responds");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
