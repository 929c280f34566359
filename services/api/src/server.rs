use crate::cli::ServeArgs;
use crate::infra::{load_classifier, with_rules_override, AppState};
use crate::routes::with_classification_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use role_classifier::config::AppConfig;
use role_classifier::error::AppError;
use role_classifier::telemetry;
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
    let classifier_config = with_rules_override(config.classifier.clone(), args.rules.take());

    telemetry::init(&config.telemetry, classifier_config.verbose)?;

    let classifier = Arc::new(load_classifier(&classifier_config)?);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        classifier: classifier.clone(),
        label_column: classifier_config.label_column.clone(),
    };

    let app = with_classification_routes(classifier)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "role classifier ready");

    axum::serve(listener, app).await?;
    Ok(())
}
