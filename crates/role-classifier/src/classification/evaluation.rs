use serde::Serialize;

use super::patterns::PatternSet;
use super::rules::{CategoryId, CategoryRules, Phase, RuleConfigError, RuleList};

/// Include/exclude patterns for one field of one category.
#[derive(Debug, Clone)]
pub struct FieldRules {
    include: PatternSet,
    exclude: PatternSet,
}

impl FieldRules {
    fn compile(
        id: &CategoryId,
        rules: &CategoryRules,
        phase: Phase,
    ) -> Result<Self, RuleConfigError> {
        let (include, exclude) = RuleList::for_phase(phase);
        Ok(Self {
            include: PatternSet::compile(id, include, rules.list(include))?,
            exclude: PatternSet::compile(id, exclude, rules.list(exclude))?,
        })
    }

    /// Include matches and exclude does not.
    pub fn matches(&self, text: &str) -> bool {
        self.include.is_match(text) && !self.exclude.is_match(text)
    }

    pub fn evaluate(&self, texts: &[String]) -> FieldMask {
        let include: Vec<bool> = texts.iter().map(|text| self.include.is_match(text)).collect();
        let exclude: Vec<bool> = texts.iter().map(|text| self.exclude.is_match(text)).collect();
        let decision = include
            .iter()
            .zip(&exclude)
            .map(|(included, excluded)| *included && !*excluded)
            .collect();

        FieldMask {
            include,
            exclude,
            decision,
        }
    }

    pub fn trace(&self, text: &str) -> FieldTrace {
        let included_by = self.include.matching(text);
        let excluded_by = self.exclude.matching(text);
        let matched = !included_by.is_empty() && excluded_by.is_empty();
        FieldTrace {
            included_by,
            excluded_by,
            matched,
        }
    }

    pub fn include(&self) -> &PatternSet {
        &self.include
    }

    pub fn exclude(&self) -> &PatternSet {
        &self.exclude
    }
}

/// A category with both fields compiled.
#[derive(Debug, Clone)]
pub struct CompiledCategory {
    id: CategoryId,
    title: FieldRules,
    skills: FieldRules,
}

impl CompiledCategory {
    pub(crate) fn compile(id: &CategoryId, rules: &CategoryRules) -> Result<Self, RuleConfigError> {
        Ok(Self {
            id: id.clone(),
            title: FieldRules::compile(id, rules, Phase::Title)?,
            skills: FieldRules::compile(id, rules, Phase::Skills)?,
        })
    }

    pub fn id(&self) -> &CategoryId {
        &self.id
    }

    pub fn field(&self, phase: Phase) -> &FieldRules {
        match phase {
            Phase::Title => &self.title,
            Phase::Skills => &self.skills,
        }
    }
}

/// Per-record masks for one category over one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMask {
    pub include: Vec<bool>,
    pub exclude: Vec<bool>,
    pub decision: Vec<bool>,
}

impl FieldMask {
    pub fn len(&self) -> usize {
        self.decision.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decision.is_empty()
    }

    pub fn count(&self) -> usize {
        self.decision.iter().filter(|hit| **hit).count()
    }
}

/// Which patterns fired for one record on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldTrace {
    pub included_by: Vec<String>,
    pub excluded_by: Vec<String>,
    pub matched: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(rules: CategoryRules) -> CompiledCategory {
        CompiledCategory::compile(&CategoryId::from("analytics_engineer"), &rules)
            .expect("category compiles")
    }

    fn texts(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn decision_is_include_and_not_exclude() {
        let compiled = category(CategoryRules {
            skills_include: vec![r"\bdbt\b".to_string()],
            skills_exclude: vec![r"\btableau\b".to_string()],
            ..CategoryRules::default()
        });

        let mask = compiled
            .field(Phase::Skills)
            .evaluate(&texts(&["dbt", "dbt tableau", "tableau", ""]));

        assert_eq!(mask.include, vec![true, true, false, false]);
        assert_eq!(mask.exclude, vec![false, true, true, false]);
        assert_eq!(mask.decision, vec![true, false, false, false]);
        assert_eq!(mask.count(), 1);
    }

    #[test]
    fn empty_include_list_yields_all_false() {
        let compiled = category(CategoryRules {
            title_exclude: vec![r"\blead\b".to_string()],
            skills_include: vec![r".*".to_string()],
            ..CategoryRules::default()
        });

        let mask = compiled
            .field(Phase::Title)
            .evaluate(&texts(&["analytics engineer", "", "lead"]));
        assert!(mask.decision.iter().all(|hit| !hit));
        assert_eq!(mask.include, vec![false, false, false]);
    }

    #[test]
    fn fields_are_evaluated_independently() {
        let compiled = category(CategoryRules {
            title_include: vec![r"\banalytics engineer\b".to_string()],
            ..CategoryRules::default()
        });

        assert!(compiled.field(Phase::Title).matches("analytics engineer"));
        assert!(!compiled.field(Phase::Skills).matches("analytics engineer"));
    }

    #[test]
    fn trace_lists_fired_patterns() {
        let compiled = category(CategoryRules {
            skills_include: vec![r"\bdbt\b".to_string(), r"\bdata modeling\b".to_string()],
            skills_exclude: vec![r"\bconsult\b".to_string()],
            ..CategoryRules::default()
        });

        let trace = compiled.field(Phase::Skills).trace("dbt consult");
        assert_eq!(trace.included_by, vec![r"\bdbt\b".to_string()]);
        assert_eq!(trace.excluded_by, vec![r"\bconsult\b".to_string()]);
        assert!(!trace.matched);
    }
}
