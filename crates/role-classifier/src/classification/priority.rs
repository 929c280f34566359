use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use super::rules::{CategoryId, CategoryRules, RuleConfigError};

/// Total order over categories. Earlier entries win overlapping matches in
/// both phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PriorityOrder(Vec<CategoryId>);

impl PriorityOrder {
    pub fn new(
        ids: &[CategoryId],
        categories: &BTreeMap<CategoryId, CategoryRules>,
    ) -> Result<Self, RuleConfigError> {
        let mut seen = HashSet::with_capacity(ids.len());
        for id in ids {
            if !categories.contains_key(id) {
                return Err(RuleConfigError::UnknownCategory(id.clone()));
            }
            if !seen.insert(id) {
                return Err(RuleConfigError::DuplicatePriority(id.clone()));
            }
        }

        Ok(Self(ids.to_vec()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryId> {
        self.0.iter()
    }

    pub fn position(&self, id: &CategoryId) -> Option<usize> {
        self.0.iter().position(|candidate| candidate == id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
