use std::fmt;

#[cfg(feature = "rayon")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, info};

use super::evaluation::{CompiledCategory, FieldMask, FieldTrace};
use super::normalizer::normalize_text;
use super::priority::PriorityOrder;
use super::rules::{CategoryId, Phase, RuleBook, RuleConfigError};

pub const UNDEFINED_LABEL: &str = "undefined";

/// Input record: raw title and skills text, either of which may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
}

impl JobPosting {
    pub fn new(id: impl Into<String>, title: Option<&str>, skills: Option<&str>) -> Self {
        Self {
            id: id.into(),
            title: title.map(str::to_string),
            skills: skills.map(str::to_string),
        }
    }
}

/// Final label of a record. Serializes as the bare category id or
/// `"undefined"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoleLabel {
    Category(CategoryId),
    Undefined,
}

impl RoleLabel {
    pub fn as_str(&self) -> &str {
        match self {
            RoleLabel::Category(id) => id.as_str(),
            RoleLabel::Undefined => UNDEFINED_LABEL,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, RoleLabel::Undefined)
    }
}

impl fmt::Display for RoleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RoleLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Label of one record plus the phase that claimed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub id: String,
    pub label: RoleLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
}

/// Records claimed by a phase and the running total afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseSummary {
    pub phase: Phase,
    pub claimed: usize,
    pub assigned: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: RoleLabel,
    pub count: usize,
}

/// Result of a batch run, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationReport {
    pub assignments: Vec<Assignment>,
    pub phases: Vec<PhaseSummary>,
    pub tally: Vec<LabelCount>,
}

impl ClassificationReport {
    pub fn labels(&self) -> Vec<RoleLabel> {
        self.assignments
            .iter()
            .map(|assignment| assignment.label.clone())
            .collect()
    }

    pub fn assigned(&self) -> usize {
        self.phases.last().map(|phase| phase.assigned).unwrap_or(0)
    }
}

/// Per-category trace for a single posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTrace {
    pub category: CategoryId,
    pub title: FieldTrace,
    pub skills: FieldTrace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explanation {
    pub normalized_title: String,
    pub normalized_skills: String,
    pub label: RoleLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
    pub categories: Vec<CategoryTrace>,
}

/// Write-once assignment state. The only mutable data of a run.
struct AssignmentState {
    labels: Vec<Option<(usize, Phase)>>,
    assigned: usize,
}

impl AssignmentState {
    fn new(len: usize) -> Self {
        Self {
            labels: vec![None; len],
            assigned: 0,
        }
    }

    fn commit(&mut self, phase: Phase, masks: &[FieldMask]) -> usize {
        let before = self.assigned;
        for (category, mask) in masks.iter().enumerate() {
            for (slot, hit) in self.labels.iter_mut().zip(&mask.decision) {
                if *hit && slot.is_none() {
                    *slot = Some((category, phase));
                    self.assigned += 1;
                }
            }
        }
        self.assigned - before
    }
}

/// Compiled rule engine. Built once from a [`RuleBook`] and shared
/// read-only across classification calls.
#[derive(Debug, Clone)]
pub struct RoleClassifier {
    rule_book: RuleBook,
    priority: PriorityOrder,
    // Same order as `priority`.
    categories: Vec<CompiledCategory>,
}

impl RoleClassifier {
    pub fn compile(rule_book: RuleBook) -> Result<Self, RuleConfigError> {
        let priority = PriorityOrder::new(&rule_book.priority, &rule_book.categories)?;

        let mut categories = Vec::with_capacity(priority.len());
        for (id, rules) in &rule_book.categories {
            let compiled = CompiledCategory::compile(id, rules)?;
            if priority.position(id).is_some() {
                categories.push(compiled);
            }
        }
        categories.sort_by_key(|category| priority.position(category.id()));

        debug!(
            categories = rule_book.categories.len(),
            prioritized = priority.len(),
            "compiled role rule book"
        );

        Ok(Self {
            rule_book,
            priority,
            categories,
        })
    }

    pub fn standard() -> Result<Self, RuleConfigError> {
        Self::compile(RuleBook::standard())
    }

    pub fn rule_book(&self) -> &RuleBook {
        &self.rule_book
    }

    pub fn priority(&self) -> &PriorityOrder {
        &self.priority
    }

    pub fn categories(&self) -> &[CompiledCategory] {
        &self.categories
    }

    /// Two-phase classification: titles first, then skills for whatever is
    /// still unassigned, each phase walking the priority order.
    pub fn classify(&self, postings: &[JobPosting], verbose: bool) -> ClassificationReport {
        let titles: Vec<String> = postings
            .iter()
            .map(|posting| normalize_text(posting.title.as_deref()))
            .collect();
        let skills: Vec<String> = postings
            .iter()
            .map(|posting| normalize_text(posting.skills.as_deref()))
            .collect();

        let total = postings.len();
        let mut state = AssignmentState::new(total);
        let mut phases = Vec::with_capacity(Phase::ORDERED.len());

        for phase in Phase::ORDERED {
            let texts = match phase {
                Phase::Title => &titles,
                Phase::Skills => &skills,
            };
            let masks = self.phase_masks(phase, texts);
            let claimed = state.commit(phase, &masks);

            if verbose {
                info!(
                    phase = phase.label(),
                    claimed,
                    assigned = state.assigned,
                    total,
                    "classification phase complete"
                );
            } else {
                debug!(
                    phase = phase.label(),
                    claimed,
                    assigned = state.assigned,
                    total,
                    "classification phase complete"
                );
            }

            phases.push(PhaseSummary {
                phase,
                claimed,
                assigned: state.assigned,
                total,
            });
        }

        let mut counts = vec![0usize; self.categories.len()];
        let mut undefined = 0usize;
        let assignments = postings
            .iter()
            .zip(state.labels)
            .map(|(posting, slot)| match slot {
                Some((category, phase)) => {
                    counts[category] += 1;
                    Assignment {
                        id: posting.id.clone(),
                        label: RoleLabel::Category(self.categories[category].id().clone()),
                        phase: Some(phase),
                    }
                }
                None => {
                    undefined += 1;
                    Assignment {
                        id: posting.id.clone(),
                        label: RoleLabel::Undefined,
                        phase: None,
                    }
                }
            })
            .collect();

        let mut tally: Vec<LabelCount> = self
            .categories
            .iter()
            .zip(counts)
            .map(|(category, count)| LabelCount {
                label: RoleLabel::Category(category.id().clone()),
                count,
            })
            .collect();
        tally.push(LabelCount {
            label: RoleLabel::Undefined,
            count: undefined,
        });

        ClassificationReport {
            assignments,
            phases,
            tally,
        }
    }

    /// Label for a single posting; same result as a one-record batch.
    pub fn classify_one(&self, title: Option<&str>, skills: Option<&str>) -> RoleLabel {
        self.explain(title, skills).label
    }

    /// Every category's pattern hits for one posting, with the resulting label.
    pub fn explain(&self, title: Option<&str>, skills: Option<&str>) -> Explanation {
        let normalized_title = normalize_text(title);
        let normalized_skills = normalize_text(skills);

        let categories: Vec<CategoryTrace> = self
            .categories
            .iter()
            .map(|category| CategoryTrace {
                category: category.id().clone(),
                title: category.field(Phase::Title).trace(&normalized_title),
                skills: category.field(Phase::Skills).trace(&normalized_skills),
            })
            .collect();

        let winner = Phase::ORDERED.iter().find_map(|phase| {
            categories
                .iter()
                .find(|trace| match phase {
                    Phase::Title => trace.title.matched,
                    Phase::Skills => trace.skills.matched,
                })
                .map(|trace| (trace.category.clone(), *phase))
        });

        let (label, phase) = match winner {
            Some((category, phase)) => (RoleLabel::Category(category), Some(phase)),
            None => (RoleLabel::Undefined, None),
        };

        Explanation {
            normalized_title,
            normalized_skills,
            label,
            phase,
            categories,
        }
    }

    #[cfg(feature = "rayon")]
    fn phase_masks(&self, phase: Phase, texts: &[String]) -> Vec<FieldMask> {
        self.categories
            .par_iter()
            .map(|category| category.field(phase).evaluate(texts))
            .collect()
    }

    #[cfg(not(feature = "rayon"))]
    fn phase_masks(&self, phase: Phase, texts: &[String]) -> Vec<FieldMask> {
        self.categories
            .iter()
            .map(|category| category.field(phase).evaluate(texts))
            .collect()
    }
}
