use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Identifier of a role category, e.g. `data_engineer`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

impl CategoryId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Text field a phase matches against. Title runs first, skills second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Title,
    Skills,
}

impl Phase {
    pub const ORDERED: [Phase; 2] = [Phase::Title, Phase::Skills];

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Title => "title",
            Phase::Skills => "skills",
        }
    }
}

/// One of the four pattern lists carried by a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleList {
    TitleInclude,
    TitleExclude,
    SkillsInclude,
    SkillsExclude,
}

impl RuleList {
    pub fn label(&self) -> &'static str {
        match self {
            RuleList::TitleInclude => "title_include",
            RuleList::TitleExclude => "title_exclude",
            RuleList::SkillsInclude => "skills_include",
            RuleList::SkillsExclude => "skills_exclude",
        }
    }

    pub fn for_phase(phase: Phase) -> (RuleList, RuleList) {
        match phase {
            Phase::Title => (RuleList::TitleInclude, RuleList::TitleExclude),
            Phase::Skills => (RuleList::SkillsInclude, RuleList::SkillsExclude),
        }
    }
}

impl fmt::Display for RuleList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Uncompiled pattern lists for a single category. Lists missing from a
/// rule file default to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryRules {
    pub title_include: Vec<String>,
    pub title_exclude: Vec<String>,
    pub skills_include: Vec<String>,
    pub skills_exclude: Vec<String>,
}

impl CategoryRules {
    pub fn list(&self, list: RuleList) -> &[String] {
        match list {
            RuleList::TitleInclude => &self.title_include,
            RuleList::TitleExclude => &self.title_exclude,
            RuleList::SkillsInclude => &self.skills_include,
            RuleList::SkillsExclude => &self.skills_exclude,
        }
    }
}

/// Rule configuration document: category patterns plus the evaluation order
/// shared by both phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleBook {
    pub categories: BTreeMap<CategoryId, CategoryRules>,
    pub priority: Vec<CategoryId>,
}

impl RuleBook {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RuleConfigError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| RuleConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RuleConfigError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, RuleConfigError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Configuration-time failure. Raised before any record is processed.
#[derive(Debug, thiserror::Error)]
pub enum RuleConfigError {
    #[error("category '{category}' has an invalid {list} pattern '{pattern}': {source}")]
    InvalidPattern {
        category: CategoryId,
        list: RuleList,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("priority lists '{0}' but no such category is defined")]
    UnknownCategory(CategoryId),
    #[error("priority lists '{0}' more than once")]
    DuplicatePriority(CategoryId),
    #[error("failed to read rule book {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed rule book: {0}")]
    Parse(#[from] serde_json::Error),
}
