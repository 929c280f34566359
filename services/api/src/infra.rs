use metrics_exporter_prometheus::PrometheusHandle;
use role_classifier::classification::RoleClassifier;
use role_classifier::config::ClassifierConfig;
use role_classifier::error::AppError;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) classifier: Arc<RoleClassifier>,
    pub(crate) label_column: String,
}

/// Applies a command-line rules path over the environment setting.
pub(crate) fn with_rules_override(
    mut config: ClassifierConfig,
    rules: Option<PathBuf>,
) -> ClassifierConfig {
    if rules.is_some() {
        config.rules_path = rules;
    }
    config
}

/// Reads and compiles the configured rule book. Any invalid pattern or
/// priority entry aborts before a single record is labelled.
pub(crate) fn load_classifier(config: &ClassifierConfig) -> Result<RoleClassifier, AppError> {
    let rule_book = config.rule_book()?;
    let classifier = RoleClassifier::compile(rule_book)?;

    match &config.rules_path {
        Some(path) => info!(
            path = %path.display(),
            categories = classifier.priority().len(),
            "loaded rule book"
        ),
        None => info!(
            categories = classifier.priority().len(),
            "using built-in rule book"
        ),
    }

    Ok(classifier)
}
