use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::classification::router::{classify_handler, ClassifyRequest, PostingPayload};
use crate::classification::classification_router;

#[tokio::test]
async fn classify_handler_returns_one_label_per_record() {
    let classifier = Arc::new(standard_classifier());
    let request = ClassifyRequest {
        records: vec![
            PostingPayload {
                id: Some("p-1".to_string()),
                title: Some("Senior Data Scientist".to_string()),
                skills: None,
            },
            PostingPayload::default(),
        ],
        verbose: false,
    };

    let response = classify_handler(State(classifier), axum::Json(request)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    assert_eq!(payload["labels"], json!(["data_scientist", "undefined"]));
    assert_eq!(payload["summary"]["total"], json!(2));
}

#[tokio::test]
async fn classify_route_accepts_missing_fields() {
    let router = classification_router(Arc::new(standard_classifier()));

    let body = json!({
        "records": [
            {"title": "Consultant", "skills": "dbt, data modeling"},
            {"title": "Business Analyst", "skills": "sql, excel"},
            {"skills": null},
        ]
    });

    let response = router
        .oneshot(
            Request::post("/api/v1/roles/classify")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).expect("serialize")))
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["labels"],
        json!(["analytics_engineer", "business_analyst", "undefined"])
    );

    let phases = payload["summary"]["phases"].as_array().expect("phases");
    assert_eq!(phases.len(), 2);
    assert_eq!(phases[0]["phase"], json!("title"));
    assert_eq!(phases[0]["claimed"], json!(1));
    assert_eq!(phases[1]["assigned"], json!(2));
}

#[tokio::test]
async fn classify_route_rejects_malformed_payload() {
    let router = classification_router(Arc::new(standard_classifier()));

    let response = router
        .oneshot(
            Request::post("/api/v1/roles/classify")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"records": "nope"}"#))
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn explain_route_reports_the_winning_phase() {
    let router = classification_router(Arc::new(standard_classifier()));

    let response = router
        .oneshot(
            Request::post("/api/v1/roles/explain")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"title": "Consultant", "skills": "dbt"}).to_string(),
                ))
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["label"], json!("analytics_engineer"));
    assert_eq!(payload["phase"], json!("skills"));
    assert_eq!(payload["normalized_skills"], json!("dbt"));
}

#[tokio::test]
async fn rules_route_lists_priority_in_order() {
    let router = classification_router(Arc::new(standard_classifier()));

    let response = router
        .oneshot(
            Request::get("/api/v1/roles/rules")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let priority: Vec<&str> = payload["priority"]
        .as_array()
        .expect("priority array")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(
        priority,
        vec![
            "data_scientist",
            "data_ops",
            "analytics_engineer",
            "data_engineer",
            "business_analyst",
            "data_analyst",
        ]
    );
    assert!(payload["categories"]["data_ops"]["skills_include"].is_array());
}
