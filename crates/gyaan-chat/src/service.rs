//! One chat turn, end to end.
//!
//! ```text
//! text ──► classifier ──blocked──► append user + canned reply, log `blocked`
//!              │
//!           allowed
//!              ▼
//!   log `question` ─► assemble ─► append user ─► provider ─► finish_reply ─► append assistant
//! ```
//!
//! Each submitted message writes at most one analytics record, and the
//! `question` record is written before the provider is called.

use std::sync::Arc;

use gyaan_analytics::{aggregate, AnalyticsSummary, EventRecord, EventStore, EventType, JsonlEventLog};
use gyaan_config::Config;
use gyaan_core::{assemble, ChatRequest, Session};
use gyaan_moderation::{risk_domain, ContentClassifier, PolicyFilter, RiskDomain, Verdict};
use gyaan_observability::{session_span, turn_span};
use serde::Serialize;
use tracing::{debug, info, warn, Instrument};

use crate::client::ClientState;
use crate::error::{ChatError, Result};
use crate::postprocess::finish_reply;
use crate::prompts::{UiStrings, PERSONA};
use crate::settings::{ChatSettings, MAX_TOKENS, TEMPERATURE};
use crate::transcript::transcript_csv;

/// What happened to one submitted message.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Blank input; nothing recorded.
    Ignored,
    /// Rejected by the content policy. The model was not called.
    Blocked { reply: String },
    /// No completion client could be built, e.g. a missing API key.
    Unavailable { reason: String },
    /// The completion call failed. No assistant message was stored.
    ServiceError { message: String },
    Answered {
        content: String,
        risk: Option<RiskDomain>,
    },
}

/// Dashboard counters over every session in the log.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub summary: AnalyticsSummary,
}

pub struct ChatService {
    classifier: Arc<dyn ContentClassifier>,
    client: ClientState,
    store: Arc<dyn EventStore>,
    settings: ChatSettings,
    strings: &'static UiStrings,
}

impl ChatService {
    /// Service with the built-in policy filter.
    pub fn new(
        settings: ChatSettings,
        client: ClientState,
        store: Arc<dyn EventStore>,
    ) -> Result<Self> {
        let strings = UiStrings::for_language(&settings.language)
            .ok_or_else(|| ChatError::UnsupportedLanguage(settings.language.clone()))?;

        Ok(Self {
            classifier: Arc::new(PolicyFilter::default()),
            client,
            store,
            settings,
            strings,
        })
    }

    /// Wire everything from configuration: JSONL log under the data dir and
    /// an OpenAI-compatible client keyed from the environment.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = JsonlEventLog::new(config.storage.analytics_path()?);
        info!("analytics log at {:?}", store.path());
        let client = ClientState::from_config(&config.llm);
        Self::new(ChatSettings::from(config), client, Arc::new(store))
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn ContentClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ChatSettings {
        &mut self.settings
    }

    pub fn strings(&self) -> &'static UiStrings {
        self.strings
    }

    pub fn client(&self) -> &ClientState {
        &self.client
    }

    /// New session seeded with persona and welcome; records `session_start`.
    pub async fn start_session(&self) -> Session {
        let session = Session::new(PERSONA, self.strings.welcome);
        let span = session_span(session.id().as_str());
        async {
            info!("session started");
            self.log_event(EventType::SessionStart, &session).await;
        }
        .instrument(span)
        .await;
        session
    }

    /// Rewrite the persona and welcome messages in place.
    pub fn refresh_preamble(&self, session: &mut Session) {
        session.refresh_preamble(PERSONA, self.strings.welcome);
    }

    pub async fn handle_turn(&self, session: &mut Session, text: &str) -> TurnOutcome {
        if text.trim().is_empty() {
            return TurnOutcome::Ignored;
        }
        let span = turn_span(session.id().as_str(), session.turn_count());
        self.run_turn(session, text).instrument(span).await
    }

    async fn run_turn(&self, session: &mut Session, text: &str) -> TurnOutcome {
        self.refresh_preamble(session);

        if self.settings.moderation_enabled {
            if let Verdict::Blocked { rule } = self.classifier.classify(text) {
                info!(rule = %rule, "message blocked by content policy");
                let reply = self.strings.blocked.to_string();
                session.push_user(text);
                session.push_assistant(reply.clone());
                self.log_event(EventType::Blocked, session).await;
                return TurnOutcome::Blocked { reply };
            }
        }

        self.log_event(EventType::Question, session).await;

        let risk = risk_domain(text);
        if let Some(domain) = risk {
            debug!(domain = %domain, "sensitive-advice domain detected");
        }

        let directive = self.settings.directive(self.strings);
        let messages = assemble(PERSONA, session.messages(), text, &directive);
        session.push_user(text);

        let provider = match &self.client {
            ClientState::Ready(provider) => Arc::clone(provider),
            ClientState::Unavailable(reason) => {
                return TurnOutcome::Unavailable {
                    reason: reason.clone(),
                }
            }
        };

        let request = ChatRequest::new(self.settings.model.clone())
            .with_messages(messages)
            .temperature(TEMPERATURE)
            .max_tokens(MAX_TOKENS);

        match provider.chat(request).await {
            Ok(response) => {
                let content = finish_reply(response.text(), risk, self.settings.always_add_practice);
                session.push_assistant(content.clone());
                debug!(chars = content.len(), "reply stored");
                TurnOutcome::Answered { content, risk }
            }
            Err(e) => {
                warn!(error = %e, "completion call failed");
                TurnOutcome::ServiceError {
                    message: format!("LLM error: {}", e),
                }
            }
        }
    }

    pub async fn dashboard(&self) -> Result<DashboardView> {
        let records = self.store.read_all().await?;
        Ok(DashboardView {
            summary: aggregate(&records),
        })
    }

    pub fn export_transcript(&self, session: &Session) -> Result<Vec<u8>> {
        transcript_csv(session)
    }

    /// The raw log, `None` when nothing was captured yet.
    pub async fn export_analytics(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.store.export_raw().await?)
    }

    /// Best-effort: a failed append never affects the turn.
    async fn log_event(&self, event_type: EventType, session: &Session) {
        let record = EventRecord::new(event_type, session.id().as_str(), self.settings.language.as_str());
        if let Err(e) = self.store.append(&record).await {
            warn!(error = %e, event = %record.event_type, "failed to record analytics event");
        }
    }
}
