//! Advisory risk domains.
//!
//! A risk domain never blocks a message; it only selects a disclaimer that is
//! appended after the model's reply. Buckets are checked in order and the
//! first keyword hit wins. Matching is plain substring search on lower-cased
//! input, so "tax" also fires inside "syntax".

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskDomain {
    Medical,
    Legal,
    Financial,
}

const MEDICAL: &[&str] = &["diagnose", "prescribe", "dose", "my symptoms", "treatment", "medicine"];
const LEGAL: &[&str] = &["lawsuit", "contract", "legal", "court", "divorce notice", "section"];
const FINANCIAL: &[&str] = &["invest", "stock", "mutual fund", "returns", "loan", "tax", "roi"];

impl RiskDomain {
    pub const ALL: [RiskDomain; 3] = [RiskDomain::Medical, RiskDomain::Legal, RiskDomain::Financial];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskDomain::Medical => "medical",
            RiskDomain::Legal => "legal",
            RiskDomain::Financial => "financial",
        }
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            RiskDomain::Medical => MEDICAL,
            RiskDomain::Legal => LEGAL,
            RiskDomain::Financial => FINANCIAL,
        }
    }

    pub fn disclaimer(&self) -> &'static str {
        match self {
            RiskDomain::Medical => {
                "For personal medical concerns, please consult a qualified clinician. Breath and rest can support—not replace—care."
            }
            RiskDomain::Legal => {
                "For binding legal matters, consult a licensed attorney. This is reflective guidance, not legal advice."
            }
            RiskDomain::Financial => {
                "For investments or taxes, consult a certified professional. Consider decision hygiene and risk realism."
            }
        }
    }
}

impl std::fmt::Display for RiskDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn risk_domain(text: &str) -> Option<RiskDomain> {
    let lowered = text.to_lowercase();
    RiskDomain::ALL
        .into_iter()
        .find(|domain| domain.keywords().iter().any(|k| lowered.contains(k)))
}
