use crate::{ModerationError, ModerationResult, PolicyConfig};
use once_cell::sync::Lazy;
use regex::Regex;

static DEFAULT_FILTER: Lazy<PolicyFilter> = Lazy::new(|| {
    PolicyFilter::new(PolicyConfig::default()).expect("built-in policy patterns compile")
});

/// Outcome of classifying one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    Blocked { rule: String },
}

impl Verdict {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Verdict::Blocked { .. })
    }
}

/// Pluggable moderation capability. Callers only depend on this trait.
pub trait ContentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Verdict;
}

/// Regex-backed classifier over an ordered rule set.
#[derive(Debug, Clone)]
pub struct PolicyFilter {
    compiled: Vec<(String, Regex)>,
}

impl PolicyFilter {
    pub fn new(config: PolicyConfig) -> ModerationResult<Self> {
        let compiled = config
            .rules
            .into_iter()
            .map(|rule| {
                Regex::new(&rule.pattern)
                    .map(|regex| (rule.name.clone(), regex))
                    .map_err(|e| ModerationError::InvalidPattern {
                        rule: rule.name,
                        error: e.to_string(),
                    })
            })
            .collect::<ModerationResult<Vec<_>>>()?;
        Ok(Self { compiled })
    }

    /// Shared filter built from the built-in rules.
    pub fn builtin() -> &'static PolicyFilter {
        &DEFAULT_FILTER
    }

    /// Name of the first rule matching `text`, if any.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        if text.is_empty() {
            return None;
        }
        let lowered = text.to_lowercase();
        self.compiled
            .iter()
            .find(|(_, regex)| regex.is_match(&lowered))
            .map(|(name, _)| name.as_str())
    }

    pub fn rule_count(&self) -> usize {
        self.compiled.len()
    }
}

impl Default for PolicyFilter {
    fn default() -> Self {
        DEFAULT_FILTER.clone()
    }
}

impl ContentClassifier for PolicyFilter {
    fn classify(&self, text: &str) -> Verdict {
        match self.first_match(text) {
            Some(rule) => {
                tracing::debug!(rule, "message blocked by policy");
                Verdict::Blocked {
                    rule: rule.to_string(),
                }
            }
            None => Verdict::Allowed,
        }
    }
}

/// True when `text` matches any built-in blocking rule.
pub fn violates_policy(text: &str) -> bool {
    DEFAULT_FILTER.first_match(text).is_some()
}
