//! Integration tests for the riskscope assessment and chat flows
//!
//! These drive the public API end-to-end over a real (temporary) document
//! store: submit-shaped data in, derived scores and a persisted chat log
//! out.

use riskscope_core::chat::{build_context, ChatSession, SendOutcome, CONNECTION_FALLBACK};
use riskscope_core::dashboard;
use riskscope_core::services::{AskReply, AskRequest, RiskAssistant};
use riskscope_core::store::Database;
use riskscope_core::types::{
    ChatMessage, ChatRole, DashboardData, FinancePrediction, HealthPrediction, HealthProfile,
    RiskLevel,
};
use riskscope_core::{Config, Result};
use tempfile::TempDir;

fn health_form() -> HealthProfile {
    HealthProfile {
        male: 1,
        age: 50.0,
        education: 1,
        current_smoker: 0,
        cigs_per_day: 0.0,
        bp_meds: 0,
        prevalent_stroke: 0,
        prevalent_hyp: 0,
        diabetes: 0,
        tot_chol: 200.0,
        sys_bp: 130.0,
        dia_bp: 80.0,
        bmi: 25.0,
        heart_rate: 70.0,
        glucose: 85.0,
    }
}

fn finance_prediction(fsi: f64) -> FinancePrediction {
    serde_json::from_value(serde_json::json!({"FSI": fsi, "risk": "Low", "score": 75.0})).unwrap()
}

fn health_prediction() -> HealthPrediction {
    serde_json::from_value(serde_json::json!({"risk": "Low", "score": 95.0})).unwrap()
}

fn populated_data() -> DashboardData {
    DashboardData {
        finance_result: Some(finance_prediction(0.25)),
        health_result: Some(health_prediction()),
        health_form: Some(health_form()),
        finance_form: None,
    }
}

// ============================================
// Dashboard flow
// ============================================

#[test]
fn scores_survive_a_store_round_trip() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("riskscope/data.db");
    let db = Database::open(&db_path).unwrap();
    db.migrate().unwrap();

    let data = populated_data();
    db.save_dashboard(&data).unwrap();

    let reloaded = db.load_dashboard().unwrap();
    let bundle_before = dashboard::assemble(&data).unwrap();
    let bundle_after = dashboard::assemble(&reloaded).unwrap();

    // Recomputing from the reloaded document yields the identical bundle
    assert_eq!(bundle_before, bundle_after);
    assert_eq!(bundle_after.finance_score, 75);
    assert_eq!(bundle_after.finance_classification, RiskLevel::Low);
    assert_eq!(bundle_after.health_score, 100);
}

#[test]
fn bundle_serialization_uses_the_dashboard_wire_shape() {
    let bundle = dashboard::assemble(&populated_data()).unwrap();
    let json = serde_json::to_value(&bundle).unwrap();

    assert!(json.get("overallRiskScore").is_some());
    assert!(json.get("timeHorizonInterpretation").is_some());
    assert_eq!(
        json.get("financeClassification").and_then(|v| v.as_str()),
        Some("Low Risk")
    );
}

#[test]
fn reopening_the_database_preserves_documents() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("data.db");

    {
        let db = Database::open(&db_path).unwrap();
        db.migrate().unwrap();
        db.save_dashboard(&populated_data()).unwrap();
    }

    let db = Database::open(&db_path).unwrap();
    db.migrate().unwrap();
    let reloaded = db.load_dashboard().unwrap();
    assert!(reloaded.finance_result.is_some());
    assert!(reloaded.health_result.is_some());
}

// ============================================
// Chat flow
// ============================================

struct CannedAssistant {
    answer: &'static str,
    fail: bool,
}

impl RiskAssistant for CannedAssistant {
    async fn ask(&self, request: &AskRequest) -> Result<AskReply> {
        if self.fail {
            return Err(riskscope_core::Error::upstream("assistant", "down"));
        }
        assert!(!request.context.finance_risk.is_empty());
        Ok(AskReply {
            answer: self.answer.to_string(),
            sources: vec!["rag-index".to_string()],
        })
    }
}

#[tokio::test]
async fn chat_turn_persists_an_ordered_placeholder_free_log() {
    let db = Database::open_in_memory().unwrap();
    db.migrate().unwrap();

    let data = populated_data();
    let bundle = dashboard::assemble(&data).unwrap();
    let context = build_context(&data, &bundle);
    assert!(context.is_some());

    let mut session = ChatSession::restore(db.load_chat_history().unwrap(), context, Some(&bundle));

    let assistant = CannedAssistant {
        answer: "Keep your debt-to-income ratio below 0.35.",
        fail: false,
    };
    let outcome = session.send("How can I improve my finance score?", &assistant).await;
    assert_eq!(outcome, SendOutcome::Answered);

    db.save_chat_history(&session.persistable()).unwrap();

    let stored = db.load_chat_history().unwrap();
    // welcome + user + assistant, in insertion order, no placeholder
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[0].role, ChatRole::Assistant);
    assert_eq!(stored[1].role, ChatRole::User);
    assert_eq!(stored[2].role, ChatRole::Assistant);
    assert_eq!(stored[2].content, "Keep your debt-to-income ratio below 0.35.");
    assert!(stored.iter().all(|m| m.role != ChatRole::Loading));

    // A second restore continues from the stored log verbatim
    let restored = ChatSession::restore(stored.clone(), None, None);
    assert_eq!(restored.messages(), stored.as_slice());
}

#[tokio::test]
async fn failed_chat_turn_stores_the_fallback_not_the_placeholder() {
    let db = Database::open_in_memory().unwrap();
    db.migrate().unwrap();

    let data = populated_data();
    let bundle = dashboard::assemble(&data).unwrap();
    let mut session = ChatSession::restore(
        db.load_chat_history().unwrap(),
        build_context(&data, &bundle),
        Some(&bundle),
    );

    let outcome = session
        .send(
            "hello?",
            &CannedAssistant {
                answer: "",
                fail: true,
            },
        )
        .await;
    assert_eq!(outcome, SendOutcome::Failed);

    db.save_chat_history(&session.persistable()).unwrap();
    let stored = db.load_chat_history().unwrap();
    assert_eq!(stored.last().unwrap().content, CONNECTION_FALLBACK);
    assert!(stored.iter().all(|m| m.role != ChatRole::Loading));
}

#[test]
fn corrupt_chat_history_restarts_with_a_welcome() {
    let db = Database::open_in_memory().unwrap();
    db.migrate().unwrap();

    db.connection()
        .execute(
            "INSERT INTO documents (slot, body, updated_at) VALUES ('chat_history', 'garbage', '2026-01-01T00:00:00Z')",
            [],
        )
        .unwrap();

    let history = db.load_chat_history().unwrap();
    assert!(history.is_empty());

    let session = ChatSession::restore(history, None, None);
    assert_eq!(session.messages().len(), 1);
    assert_eq!(session.messages()[0].role, ChatRole::Assistant);
}

// ============================================
// Config paths
// ============================================

#[test]
fn database_path_lives_under_the_data_dir() {
    let path = Config::database_path();
    assert!(path.ends_with("riskscope/data.db"));
}

#[test]
fn chat_message_log_round_trips_through_json() {
    let messages = vec![
        ChatMessage::new(ChatRole::User, "first"),
        ChatMessage::new(ChatRole::Assistant, "second").with_sources(vec!["a".into(), "b".into()]),
    ];
    let json = serde_json::to_string(&messages).unwrap();
    let back: Vec<ChatMessage> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, messages);
}
