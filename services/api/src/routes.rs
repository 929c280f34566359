use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use role_classifier::classification::{classification_router, RoleClassifier};
use role_classifier::dataset::{
    write_labels, DatasetColumns, LabelOutput, PostingImporter, DEFAULT_SKILLS_COLUMN,
    DEFAULT_TITLE_COLUMN,
};
use role_classifier::error::AppError;
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use tracing::info;

/// Labels an uploaded CSV document and returns it as CSV.
#[derive(Debug, Deserialize)]
pub(crate) struct CsvClassifyRequest {
    pub(crate) csv: String,
    #[serde(default)]
    pub(crate) title_column: Option<String>,
    #[serde(default)]
    pub(crate) skills_column: Option<String>,
    #[serde(default)]
    pub(crate) id_column: Option<String>,
    #[serde(default)]
    pub(crate) label_column: Option<String>,
    #[serde(default)]
    pub(crate) labels_only: bool,
    #[serde(default)]
    pub(crate) verbose: bool,
}

pub(crate) fn with_classification_routes(classifier: Arc<RoleClassifier>) -> axum::Router {
    classification_router(classifier)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/roles/classify-csv",
            axum::routing::post(classify_csv_endpoint),
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
        json!({ "status": "ready", "categories": state.classifier.priority().len() })
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

pub(crate) async fn classify_csv_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<CsvClassifyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let CsvClassifyRequest {
        csv,
        title_column,
        skills_column,
        id_column,
        label_column,
        labels_only,
        verbose,
    } = payload;

    let columns = DatasetColumns {
        title: title_column.unwrap_or_else(|| DEFAULT_TITLE_COLUMN.to_string()),
        skills: skills_column.unwrap_or_else(|| DEFAULT_SKILLS_COLUMN.to_string()),
        id: id_column,
    };
    let table = PostingImporter::from_reader(Cursor::new(csv.into_bytes()), &columns)?;
    let report = state.classifier.classify(table.postings(), verbose);

    let output = if labels_only {
        LabelOutput::LabelsOnly
    } else {
        LabelOutput::AppendColumn
    };
    let label_column = label_column.unwrap_or_else(|| state.label_column.clone());
    let mut body = Vec::new();
    write_labels(&mut body, &table, &report.labels(), &label_column, output)?;

    info!(
        rows = table.len(),
        assigned = report.assigned(),
        "labelled uploaded csv"
    );

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        body,
    ))
}
