use gyaan_moderation::RiskDomain;

use crate::prompts::{practice_box, PRACTICE_MARKER};

/// Decorate a model reply before it is shown and stored.
///
/// A risk disclaimer goes after a horizontal rule; the default practice is
/// appended only when the reply carries none of its own.
pub fn finish_reply(content: &str, risk: Option<RiskDomain>, add_practice: bool) -> String {
    let mut reply = match risk {
        Some(domain) => format!("{}\n\n---\n_{}_", content.trim(), domain.disclaimer()),
        None => content.to_string(),
    };

    if add_practice && !reply.contains(PRACTICE_MARKER) {
        reply.push_str("\n\n");
        reply.push_str(&practice_box());
    }
    reply
}
