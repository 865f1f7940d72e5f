use crate::cli::ServeArgs;
use crate::infra::{AppState, Programme};
use crate::routes::with_application_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use cashback_insights::config::AppConfig;
use cashback_insights::error::AppError;
use cashback_insights::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.orders.take() {
        config.programme.orders_csv = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    let programme = Programme::load(&config.programme)?;
    info!(
        products = programme.catalog.len(),
        threshold = programme.rule.threshold,
        dataset_loaded = programme.dataset.is_some(),
        "cashback programme configured"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        programme: Arc::new(programme),
    };

    let app = with_application_routes()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "cashback insights service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
