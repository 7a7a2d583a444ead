pub mod engine;
pub mod risk;

pub use engine::{violates_policy, ContentClassifier, PolicyFilter, Verdict};
pub use risk::{risk_domain, RiskDomain};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Single blocking rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyRule {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub pattern: String,
}

impl PolicyRule {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            pattern: pattern.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Validate rule pattern (regex syntax).
    pub fn validate(&self) -> ModerationResult<()> {
        Regex::new(&self.pattern)
            .map(|_| ())
            .map_err(|e| ModerationError::InvalidPattern {
                rule: self.name.clone(),
                error: e.to_string(),
            })
    }
}

/// Ordered set of blocking rules. Matching is done on lower-cased input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyConfig {
    pub rules: Vec<PolicyRule>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

impl PolicyConfig {
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn add_rule(&mut self, rule: PolicyRule) {
        self.rules.push(rule);
    }

    pub fn validate(&self) -> ModerationResult<()> {
        for rule in &self.rules {
            rule.validate()?;
        }
        Ok(())
    }
}

/// Built-in class-safe rules: self-harm, hate, explicit content, violent intent.
pub fn default_rules() -> Vec<PolicyRule> {
    vec![
        PolicyRule::new("kill_myself", r"\bkill myself\b").with_description("Self-harm"),
        PolicyRule::new("suicide", r"\bsuicide\b").with_description("Self-harm"),
        PolicyRule::new("self_harm", r"\bself[-\s]?harm\b").with_description("Self-harm"),
        PolicyRule::new("hate", r"\bhate\s+[a-zA-Z]+\b").with_description("Hate speech"),
        PolicyRule::new("genocide", r"\bgenocide\b").with_description("Hate speech"),
        PolicyRule::new("explicit", r"\bexplicit\b").with_description("Explicit content"),
        PolicyRule::new("porn", r"\bporn\b").with_description("Explicit content"),
        PolicyRule::new("rape", r"\brape\b").with_description("Explicit content"),
        PolicyRule::new("bomb_making", r"\bhow to make (?:a )?bomb\b").with_description("Violent intent"),
        PolicyRule::new("kill_other", r"\bkill (?:him|her|them)\b").with_description("Violent intent"),
    ]
}

#[derive(Error, Debug)]
pub enum ModerationError {
    #[error("Invalid pattern for rule '{rule}': {error}")]
    InvalidPattern { rule: String, error: String },
}

pub type ModerationResult<T> = std::result::Result<T, ModerationError>;
