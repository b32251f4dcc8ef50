use crate::cli::ServeArgs;
use crate::infra::{http_registry, lifestyle_service, AppState};
use crate::routes::with_lifestyle_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use lifestyle_checker::config::AppConfig;
use lifestyle_checker::error::AppError;
use lifestyle_checker::telemetry;
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let registry = http_registry(&config.registry)?;
    let service = lifestyle_service(registry);

    let app = with_lifestyle_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, registry = %config.registry.base_url, "lifestyle checker ready");

    axum::serve(listener, app).await?;
    Ok(())
}
