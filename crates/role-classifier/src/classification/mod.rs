//! Rule-based role classification for job postings.
//!
//! Each category carries include/exclude patterns for the title and the
//! skills field. Classification runs two phases over the whole batch, titles
//! first and skills second, each walking the priority order and claiming only
//! records that no earlier category or phase has claimed.

mod defaults;
pub mod engine;
pub mod evaluation;
pub mod normalizer;
pub mod patterns;
pub mod priority;
pub mod router;
pub mod rules;

#[cfg(test)]
mod tests;

pub use engine::{
    Assignment, CategoryTrace, ClassificationReport, Explanation, JobPosting, LabelCount,
    PhaseSummary, RoleClassifier, RoleLabel, UNDEFINED_LABEL,
};
pub use evaluation::{CompiledCategory, FieldMask, FieldRules, FieldTrace};
pub use normalizer::normalize_text;
pub use patterns::PatternSet;
pub use priority::PriorityOrder;
pub use router::classification_router;
pub use rules::{CategoryId, CategoryRules, Phase, RuleBook, RuleConfigError, RuleList};
