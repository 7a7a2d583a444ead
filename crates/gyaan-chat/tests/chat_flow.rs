mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::{FailingProvider, LogSnoopingProvider, RecordingProvider};
use gyaan_analytics::{EventStore, EventType, JsonlEventLog};
use gyaan_chat::{
    ChatService, ChatSettings, ClientState, TurnOutcome, UiStrings, MAX_TOKENS, PERSONA, TEMPERATURE,
};
use gyaan_config::Config;
use gyaan_core::Role;
use gyaan_moderation::RiskDomain;
use tempfile::TempDir;

fn service(client: ClientState, log: &JsonlEventLog) -> ChatService {
    ChatService::new(ChatSettings::default(), client, Arc::new(log.clone())).unwrap()
}

async fn event_types(log: &JsonlEventLog) -> Vec<EventType> {
    log.read_all()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.event_type)
        .collect()
}

#[tokio::test]
async fn test_blocked_turn_never_calls_model() {
    let dir = TempDir::new().unwrap();
    let log = JsonlEventLog::in_dir(dir.path());
    let provider = Arc::new(RecordingProvider::with_reply("unused"));
    let service = service(ClientState::Ready(provider.clone()), &log);

    let mut session = service.start_session().await;
    let outcome = service.handle_turn(&mut session, "I want to KILL MYSELF").await;

    let blocked = UiStrings::english().blocked;
    assert_eq!(outcome, TurnOutcome::Blocked { reply: blocked.to_string() });
    assert_eq!(provider.calls(), 0);
    assert_eq!(event_types(&log).await, vec![EventType::SessionStart, EventType::Blocked]);

    let messages = session.messages();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[2].role, Role::User);
    assert_eq!(messages[2].content, "I want to KILL MYSELF");
    assert_eq!(messages[3].role, Role::Assistant);
    assert_eq!(messages[3].content, blocked);
}

#[tokio::test]
async fn test_allowed_turn_logs_question_then_answers() {
    let dir = TempDir::new().unwrap();
    let log = JsonlEventLog::in_dir(dir.path());
    let provider = Arc::new(RecordingProvider::with_reply("**Breathe.**\nStay with the breath."));
    let service = service(ClientState::Ready(provider.clone()), &log);

    let mut session = service.start_session().await;
    let outcome = service.handle_turn(&mut session, "How do I find peace?").await;

    let content = match outcome {
        TurnOutcome::Answered { content, risk } => {
            assert_eq!(risk, None);
            content
        }
        other => panic!("expected an answer, got {:?}", other),
    };
    assert!(content.starts_with("**Breathe.**\nStay with the breath.\n\n**Micro-practice (60 seconds)**"));

    let records = log.read_all().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].event_type, EventType::Question);
    assert!(records.iter().all(|r| r.sid == session.id().as_str()));
    assert!(records.iter().all(|r| r.lang == "en"));

    let request = provider.last_request().unwrap();
    assert_eq!(provider.calls(), 1);
    assert_eq!(request.model, "gpt-4o-mini");
    assert_eq!(request.options.temperature, Some(0.7));
    assert_eq!(request.options.max_tokens, Some(800));

    let roles: Vec<Role> = request.messages.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::System, Role::Assistant, Role::User, Role::System]);
    assert_eq!(request.messages[0].content, PERSONA);
    assert_eq!(request.messages[2].content, "How do I find peace?");
    assert_eq!(
        request.messages[3].content,
        "Try to keep the answer near 220 words. Include a micro-practice box. Respond only in English."
    );

    assert_eq!(session.messages().len(), 4);
    assert_eq!(session.last().unwrap().role, Role::Assistant);
    assert_eq!(session.last().unwrap().content, content);
}

#[tokio::test]
async fn test_question_recorded_before_model_call() {
    let dir = TempDir::new().unwrap();
    let log = JsonlEventLog::in_dir(dir.path());
    let provider = Arc::new(LogSnoopingProvider::new(log.clone()));
    let service = service(ClientState::Ready(provider.clone()), &log);

    let mut session = service.start_session().await;
    service.handle_turn(&mut session, "What is courage?").await;
    service.handle_turn(&mut session, "And humility?").await;

    assert_eq!(provider.seen(), vec![1, 2]);
}

#[tokio::test]
async fn test_sampling_ignores_config_file_values() {
    let dir = TempDir::new().unwrap();
    let log = JsonlEventLog::in_dir(dir.path());
    let config: Config = serde_json::from_str(
        r#"{"llm": {"model": "gpt-4o", "temperature": 1.9, "max_tokens": 4096}}"#,
    )
    .unwrap();
    let provider = Arc::new(RecordingProvider::with_reply("Micro-practice: pause."));
    let service = ChatService::new(
        ChatSettings::from(&config),
        ClientState::Ready(provider.clone()),
        Arc::new(log.clone()),
    )
    .unwrap();

    let mut session = service.start_session().await;
    service.handle_turn(&mut session, "How do I stay calm?").await;

    let request = provider.last_request().unwrap();
    assert_eq!(request.model, "gpt-4o");
    assert_eq!(request.options.temperature, Some(TEMPERATURE));
    assert_eq!(request.options.max_tokens, Some(MAX_TOKENS));
    assert_eq!(TEMPERATURE, 0.7);
    assert_eq!(MAX_TOKENS, 800);
}

#[tokio::test]
async fn test_history_is_sent_once_per_turn() {
    let dir = TempDir::new().unwrap();
    let log = JsonlEventLog::in_dir(dir.path());
    let provider = Arc::new(RecordingProvider::with_reply("Micro-practice: smile."));
    let service = service(ClientState::Ready(provider.clone()), &log);

    let mut session = service.start_session().await;
    service.handle_turn(&mut session, "What is gratitude?").await;
    service.handle_turn(&mut session, "And service?").await;

    let request = provider.last_request().unwrap();
    assert_eq!(request.messages.len(), 6);
    let first_question = request
        .messages
        .iter()
        .filter(|m| m.content == "What is gratitude?")
        .count();
    assert_eq!(first_question, 1);
    assert_eq!(request.messages[4].content, "And service?");
    assert_eq!(
        request.messages.iter().filter(|m| m.role == Role::System).count(),
        2
    );
}

#[tokio::test]
async fn test_risk_domain_appends_disclaimer() {
    let dir = TempDir::new().unwrap();
    let log = JsonlEventLog::in_dir(dir.path());
    let provider = Arc::new(RecordingProvider::with_reply(
        "**Steady.**\n\nMicro-practice: pause before deciding.\n",
    ));
    let service = service(ClientState::Ready(provider), &log);

    let mut session = service.start_session().await;
    let outcome = service
        .handle_turn(&mut session, "Should I invest my savings in stocks?")
        .await;

    match outcome {
        TurnOutcome::Answered { content, risk } => {
            assert_eq!(risk, Some(RiskDomain::Financial));
            let tail = format!("\n\n---\n_{}_", RiskDomain::Financial.disclaimer());
            assert!(content.ends_with(&tail));
            assert!(content.starts_with("**Steady.**\n\nMicro-practice: pause before deciding.\n\n---"));
            assert!(!content.contains("(60 seconds)"));
        }
        other => panic!("expected an answer, got {:?}", other),
    }
}

#[tokio::test]
async fn test_service_error_keeps_user_message_only() {
    let dir = TempDir::new().unwrap();
    let log = JsonlEventLog::in_dir(dir.path());
    let provider = Arc::new(FailingProvider::new());
    let service = service(ClientState::Ready(provider.clone()), &log);

    let mut session = service.start_session().await;
    let outcome = service.handle_turn(&mut session, "Why do I worry?").await;

    match outcome {
        TurnOutcome::ServiceError { message } => {
            assert!(message.starts_with("LLM error: "));
            assert!(message.contains("upstream exploded"));
        }
        other => panic!("expected a service error, got {:?}", other),
    }
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    assert_eq!(session.messages().len(), 3);
    assert_eq!(session.last().unwrap().role, Role::User);
    assert_eq!(event_types(&log).await, vec![EventType::SessionStart, EventType::Question]);
}

#[tokio::test]
async fn test_unavailable_client_reports_reason() {
    let dir = TempDir::new().unwrap();
    let log = JsonlEventLog::in_dir(dir.path());
    let reason = "Missing OPENAI_API_KEY environment variable.";
    let service = service(ClientState::Unavailable(reason.to_string()), &log);

    let mut session = service.start_session().await;
    let outcome = service.handle_turn(&mut session, "Hello").await;

    assert_eq!(outcome, TurnOutcome::Unavailable { reason: reason.to_string() });
    assert_eq!(session.last().unwrap().content, "Hello");
    assert_eq!(event_types(&log).await, vec![EventType::SessionStart, EventType::Question]);
}

#[tokio::test]
async fn test_moderation_can_be_switched_off() {
    let dir = TempDir::new().unwrap();
    let log = JsonlEventLog::in_dir(dir.path());
    let provider = Arc::new(RecordingProvider::with_reply("Micro-practice: listen."));
    let mut service = service(ClientState::Ready(provider.clone()), &log);
    service.settings_mut().moderation_enabled = false;

    let mut session = service.start_session().await;
    let outcome = service
        .handle_turn(&mut session, "How do schools teach suicide prevention?")
        .await;

    assert!(matches!(outcome, TurnOutcome::Answered { .. }));
    assert_eq!(provider.calls(), 1);
    assert_eq!(event_types(&log).await, vec![EventType::SessionStart, EventType::Question]);
}

#[tokio::test]
async fn test_word_target_change_applies_to_next_turn() {
    let dir = TempDir::new().unwrap();
    let log = JsonlEventLog::in_dir(dir.path());
    let provider = Arc::new(RecordingProvider::with_reply("Micro-practice: rest."));
    let mut service = service(ClientState::Ready(provider.clone()), &log);

    let mut session = service.start_session().await;
    service.settings_mut().set_word_target(300).unwrap();
    service.handle_turn(&mut session, "What is meditation?").await;

    let request = provider.last_request().unwrap();
    let directive = &request.messages.last().unwrap().content;
    assert!(directive.starts_with("Try to keep the answer near 300 words."));
}

#[tokio::test]
async fn test_log_failure_does_not_break_turn() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "x").unwrap();
    let log = JsonlEventLog::in_dir(&blocker);
    let provider = Arc::new(RecordingProvider::with_reply("Micro-practice: sit."));
    let service = service(ClientState::Ready(provider.clone()), &log);

    let mut session = service.start_session().await;
    let outcome = service.handle_turn(&mut session, "Teach me patience").await;

    assert!(matches!(outcome, TurnOutcome::Answered { .. }));
    assert_eq!(session.messages().len(), 4);

    let blocked = service.handle_turn(&mut session, "genocide").await;
    assert!(matches!(blocked, TurnOutcome::Blocked { .. }));
}

#[tokio::test]
async fn test_dashboard_and_exports() {
    let dir = TempDir::new().unwrap();
    let log = JsonlEventLog::in_dir(dir.path());
    let provider = Arc::new(RecordingProvider::with_reply("Micro-practice: notice."));
    let service = service(ClientState::Ready(provider), &log);

    assert!(service.export_analytics().await.unwrap().is_none());

    let mut session = service.start_session().await;
    service.handle_turn(&mut session, "What is joy?").await;
    service.handle_turn(&mut session, "porn").await;
    let _other = service.start_session().await;

    let summary = service.dashboard().await.unwrap().summary;
    assert_eq!(summary.question_count, 1);
    assert_eq!(summary.blocked_count, 1);
    assert_eq!(summary.session_start_count, 2);
    assert_eq!(summary.unique_sessions, 2);
    assert_eq!(summary.languages.get("en"), Some(&4));

    let raw = service.export_analytics().await.unwrap().unwrap();
    assert_eq!(String::from_utf8(raw).unwrap().lines().count(), 4);

    let non_system = session.turns().count();
    assert_eq!(non_system, 5);

    let csv_bytes = service.export_transcript(&session).unwrap();
    let mut reader = csv::Reader::from_reader(csv_bytes.as_slice());
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), non_system);
    assert_eq!(&rows[0][0], "assistant");
    assert_eq!(&rows[0][1], UiStrings::english().welcome);
    assert_eq!(&rows[1][1], "What is joy?");
    assert_eq!(&rows[4][1], UiStrings::english().blocked);

    let text = String::from_utf8(csv_bytes).unwrap();
    assert!(text.starts_with("role,content\n"));
}
