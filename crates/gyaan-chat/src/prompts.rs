//! Persona instruction and user-facing strings.

/// System instruction sent as the first message of every request.
pub const PERSONA: &str = "You are 'SRI SRI GYAAN', an AI wisdom guide inspired by public, high-level themes. You are not a person.
No impersonation, no quotes, no endorsement claims. Original phrasing only.
Style: warm, simple, brief, practical spirituality (breath, meditation, service, gratitude), gentle humor, non-dogmatic insight.
Boundaries: no medical/legal/financial prescriptions; suggest professionals when needed. Avoid harm/self-harm/hate/violence. 150–250 words by default.

Format (flexible):
1) One-line essence (bold).
2) Short explanation (2–4 lines).
3) Micro-practice: 1–3 steps.
4) Optional one-line reassurance.";

/// Marker looked for in replies before appending the default practice.
pub const PRACTICE_MARKER: &str = "Micro-practice";

pub const DEFAULT_PRACTICE: [&str; 3] = [
    "Close your eyes for 60 seconds.",
    "Breathe in for 4 counts, out for 6 counts — five rounds.",
    "Place one gentle intention for today: ‘May I be useful.’",
];

pub const DISCLAIMER: &str = "This assistant is *inspired by* Gurudev Sri Sri Ravi Shankar’s public teachings and general style (gentle, practical, meditation-centric). It is **not** the guru, does not quote his words, and does not claim endorsement.";

/// The numbered fallback practice, appended when a reply has none.
pub fn practice_box() -> String {
    let steps: Vec<String> = DEFAULT_PRACTICE
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}) {}", i + 1, step))
        .collect();
    format!("**{} (60 seconds)**\n{}", PRACTICE_MARKER, steps.join("\n"))
}

/// Strings shown to the operator, one set per language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiStrings {
    pub lang: &'static str,
    pub title: &'static str,
    pub welcome: &'static str,
    pub blocked: &'static str,
    pub disclaimer: &'static str,
    pub language_hint: &'static str,
    pub boundaries: &'static str,
    pub moderation_hint: &'static str,
    pub reflect_title: &'static str,
    pub reflect_body: &'static str,
    pub reflect_done: &'static str,
    pub dash_title: &'static str,
    pub dash_sub: &'static str,
    pub dash_metrics: [&'static str; 3],
    pub exp_transcript: &'static str,
    pub exp_analytics: &'static str,
    pub no_analytics: &'static str,
    pub input_prompt: &'static str,
    pub thinking: &'static str,
    pub footer: &'static str,
}

impl UiStrings {
    /// Strings for `lang`, if that language ships.
    pub fn for_language(lang: &str) -> Option<&'static UiStrings> {
        LANGUAGES.iter().find(|s| s.lang == lang)
    }

    pub fn english() -> &'static UiStrings {
        &LANGUAGES[0]
    }
}

static LANGUAGES: [UiStrings; 1] = [UiStrings {
    lang: "en",
    title: "🕊️ SRI SRI GYAAN",
    welcome: "Welcome. Ask from the heart; we will answer with clarity and kindness.",
    blocked: "Your message contains terms we don’t allow here. Try asking the essence without harmful or explicit wording.",
    disclaimer: DISCLAIMER,
    language_hint: "Respond only in English.",
    boundaries: "The assistant avoids impersonation and sensitive directives.",
    moderation_hint: "Blocks self-harm, hate, explicit, or targeted harassment terms.",
    reflect_title: "Daily Reflection (1 minute)",
    reflect_body: "Sit comfortably. Breathe in 4, out 6 — ten rounds. Notice one thing you can appreciate today. When ready, start your conversation.",
    reflect_done: "You’re ready. Begin your question below.",
    dash_title: "Teacher Dashboard",
    dash_sub: "Aggregated, anonymized stats across sessions. No PII stored.",
    dash_metrics: ["Questions", "Blocks", "Languages"],
    exp_transcript: "Session transcript (CSV)",
    exp_analytics: "Aggregated analytics (JSONL)",
    no_analytics: "No analytics captured yet.",
    input_prompt: "Type your question...",
    thinking: "Reflecting...",
    footer: "Class-safe, multilingual-ready, inspiration-guided. No impersonation, no quotes.",
}];
