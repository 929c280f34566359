use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::engine::{Explanation, JobPosting, LabelCount, PhaseSummary, RoleClassifier, RoleLabel};

/// Router exposing batch classification and rule inspection.
pub fn classification_router(classifier: Arc<RoleClassifier>) -> Router {
    Router::new()
        .route("/api/v1/roles/classify", post(classify_handler))
        .route("/api/v1/roles/explain", post(explain_handler))
        .route("/api/v1/roles/rules", get(rules_handler))
        .with_state(classifier)
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyRequest {
    pub records: Vec<PostingPayload>,
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PostingPayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifyResponse {
    pub labels: Vec<RoleLabel>,
    pub summary: ClassifySummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifySummary {
    pub total: usize,
    pub phases: Vec<PhaseSummary>,
    pub tally: Vec<LabelCount>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExplainRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
}

pub(crate) async fn classify_handler(
    State(classifier): State<Arc<RoleClassifier>>,
    Json(request): Json<ClassifyRequest>,
) -> Response {
    let postings: Vec<JobPosting> = request
        .records
        .into_iter()
        .enumerate()
        .map(|(index, payload)| JobPosting {
            id: payload.id.unwrap_or_else(|| index.to_string()),
            title: payload.title,
            skills: payload.skills,
        })
        .collect();

    let report = classifier.classify(&postings, request.verbose);
    let response = ClassifyResponse {
        labels: report.labels(),
        summary: ClassifySummary {
            total: postings.len(),
            phases: report.phases,
            tally: report.tally,
        },
    };

    (StatusCode::OK, Json(response)).into_response()
}

pub(crate) async fn explain_handler(
    State(classifier): State<Arc<RoleClassifier>>,
    Json(request): Json<ExplainRequest>,
) -> Json<Explanation> {
    Json(classifier.explain(request.title.as_deref(), request.skills.as_deref()))
}

pub(crate) async fn rules_handler(State(classifier): State<Arc<RoleClassifier>>) -> Response {
    let payload = json!({
        "priority": classifier.priority(),
        "categories": classifier.rule_book().categories,
    });
    (StatusCode::OK, Json(payload)).into_response()
}
