use std::collections::BTreeMap;

use axum::response::Response;
use serde_json::Value;

use crate::classification::{
    CategoryId, CategoryRules, JobPosting, RoleClassifier, RoleLabel, RuleBook,
};

pub(super) fn standard_classifier() -> RoleClassifier {
    RoleClassifier::standard().expect("built-in rules compile")
}

pub(super) fn posting(id: &str, title: Option<&str>, skills: Option<&str>) -> JobPosting {
    JobPosting::new(id, title, skills)
}

pub(super) fn label(id: &str) -> RoleLabel {
    RoleLabel::Category(CategoryId::from(id))
}

pub(super) fn patterns(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Two categories sharing the same title and skills patterns, ordered as given.
pub(super) fn overlapping_book(priority: &[&str]) -> RuleBook {
    let mut categories = BTreeMap::new();
    for id in ["narrow", "broad"] {
        categories.insert(
            CategoryId::from(id),
            CategoryRules {
                title_include: patterns(&[r"\bengineer\b"]),
                skills_include: patterns(&[r"\bsql\b"]),
                ..CategoryRules::default()
            },
        );
    }

    RuleBook {
        categories,
        priority: priority.iter().map(|id| CategoryId::from(*id)).collect(),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json body")
}
