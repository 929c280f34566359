use regex::{Regex, RegexBuilder};

use super::rules::{CategoryId, RuleConfigError, RuleList};

/// Compiled, case-insensitive patterns evaluated with OR semantics.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<Regex>,
}

impl PatternSet {
    pub(crate) fn compile(
        category: &CategoryId,
        list: RuleList,
        sources: &[String],
    ) -> Result<Self, RuleConfigError> {
        let patterns = sources
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| RuleConfigError::InvalidPattern {
                        category: category.clone(),
                        list,
                        pattern: pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// True when any pattern matches. An empty set never matches.
    pub fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(text))
    }

    /// Source text of every pattern that matches, in declaration order.
    pub fn matching(&self, text: &str) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|pattern| pattern.is_match(text))
            .map(|pattern| pattern.as_str().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
