//! Assistant chat session
//!
//! An append-only message log with a small per-turn state machine:
//! composing -> sent -> awaiting-reply -> answered | failed. While a reply
//! is pending a transient `loading` placeholder sits at the tail of the
//! log; it is removed and replaced atomically by exactly one assistant
//! message (the answer or a fixed fallback) and never reaches the store.
//!
//! Only one request may be in flight at a time; sending is refused while a
//! prior reply is pending, when the input is blank, or when the risk
//! context is missing.

use crate::services::{AskReply, AskRequest, RiskAssistant, RiskContext};
use crate::types::{ChatMessage, ChatRole, DashboardData, ScoreBundle};

/// Placeholder content shown while a reply is pending.
pub const PLACEHOLDER_TEXT: &str = "Retrieving info...";

/// Assistant message used when the service is unreachable or errors.
pub const CONNECTION_FALLBACK: &str =
    "I'm sorry, I'm having trouble connecting to my knowledge base right now. Please try again later.";

/// Assistant message used when the service replies without answer text.
pub const EMPTY_ANSWER_FALLBACK: &str =
    "I apologize, but I couldn't generate a response at this time.";

const WELCOME_NO_DATA: &str = "Hello! I'm your AI Risk Advisor. To provide personalized advice, \
    please complete the Finance and Health Risk Assessment forms first. Once you've submitted \
    both forms, I'll be able to analyze your data and provide tailored recommendations.";

const WELCOME_WITH_DATA: &str = "Hello! I'm your AI Risk Advisor. I have your risk assessment \
    data and can provide personalized advice based on your financial and health information.";

/// Outcome of a send attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The attempt was a no-op: blank input, a request already in flight,
    /// or no risk context. The log is unchanged.
    Refused,
    /// The assistant answered; the answer is the last log entry.
    Answered,
    /// The request failed upstream; the fallback is the last log entry.
    Failed,
}

/// Build the assistant's risk context from the stored data.
///
/// Returns `None` unless both prediction sides are present; the assistant
/// refuses to answer without them. The time-horizon pair comes from the
/// assembled bundle; the others pass through the predictions' own fields.
pub fn build_context(data: &DashboardData, bundle: &ScoreBundle) -> Option<RiskContext> {
    if !data.has_complete_results() {
        return None;
    }

    let health = data.health_result.as_ref()?;
    let finance = data.finance_result.as_ref()?;

    Some(RiskContext {
        health_risk: health.risk.clone().unwrap_or_default(),
        health_score: health.score.unwrap_or(0.0),
        finance_risk: finance.risk.clone().unwrap_or_default(),
        finance_score: finance.score.unwrap_or(0.0),
        time_horizon_risk: bundle.time_horizon_interpretation.as_str().to_string(),
        time_horizon_score: f64::from(bundle.time_horizon_score),
    })
}

/// The assistant conversation, restored from and persisted to the store.
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    context: Option<RiskContext>,
    in_flight: bool,
}

impl ChatSession {
    /// Restore a session from a stored history.
    ///
    /// An empty history (fresh start, or a corrupt document the store
    /// discarded) is seeded with a single welcome message whose wording
    /// depends on whether risk data is available; when a score bundle is
    /// supplied the welcome enumerates the current scores.
    pub fn restore(
        history: Vec<ChatMessage>,
        context: Option<RiskContext>,
        bundle: Option<&ScoreBundle>,
    ) -> Self {
        let messages = if history.is_empty() {
            vec![ChatMessage::new(
                ChatRole::Assistant,
                welcome_text(context.is_some(), bundle),
            )]
        } else {
            history
        };

        Self {
            messages,
            context,
            in_flight: false,
        }
    }

    /// Full log, including any pending placeholder, in insertion order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The log as it should be persisted: placeholder excluded.
    pub fn persistable(&self) -> Vec<ChatMessage> {
        self.messages
            .iter()
            .filter(|m| m.role != ChatRole::Loading)
            .cloned()
            .collect()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn has_context(&self) -> bool {
        self.context.is_some()
    }

    /// Start a turn: append the user message and the placeholder, and hand
    /// back the request to send. Returns `None` (log untouched) when the
    /// send must be refused.
    pub fn begin(&mut self, input: &str) -> Option<AskRequest> {
        let input = input.trim();
        if input.is_empty() || self.in_flight {
            return None;
        }
        let context = self.context.clone()?;

        self.messages
            .push(ChatMessage::new(ChatRole::User, input.to_string()));
        self.messages
            .push(ChatMessage::new(ChatRole::Loading, PLACEHOLDER_TEXT));
        self.in_flight = true;

        Some(AskRequest {
            input: input.to_string(),
            context,
        })
    }

    /// Finish a turn with the assistant's reply: the placeholder is removed
    /// and exactly one assistant message appended.
    pub fn resolve(&mut self, reply: AskReply) {
        let message = if reply.answer.trim().is_empty() {
            ChatMessage::new(ChatRole::Assistant, EMPTY_ANSWER_FALLBACK)
        } else {
            ChatMessage::new(ChatRole::Assistant, reply.answer).with_sources(reply.sources)
        };
        self.replace_placeholder(message);
    }

    /// Finish a turn after an upstream failure with the fixed fallback.
    pub fn fail(&mut self) {
        self.replace_placeholder(ChatMessage::new(ChatRole::Assistant, CONNECTION_FALLBACK));
    }

    fn replace_placeholder(&mut self, message: ChatMessage) {
        self.messages.retain(|m| m.role != ChatRole::Loading);
        self.messages.push(message);
        self.in_flight = false;
    }

    /// Run one full turn against the assistant service.
    pub async fn send<C: RiskAssistant>(&mut self, input: &str, client: &C) -> SendOutcome {
        let Some(request) = self.begin(input) else {
            return SendOutcome::Refused;
        };

        match client.ask(&request).await {
            Ok(reply) => {
                self.resolve(reply);
                SendOutcome::Answered
            }
            Err(e) => {
                tracing::warn!(error = %e, "Assistant request failed");
                self.fail();
                SendOutcome::Failed
            }
        }
    }
}

fn welcome_text(has_data: bool, bundle: Option<&ScoreBundle>) -> String {
    if !has_data {
        return WELCOME_NO_DATA.to_string();
    }

    match bundle {
        Some(bundle) => format!(
            "Hello! I'm your AI Risk Advisor. Here are your current scores:\n\
             - Total Risk Score: {}\n\
             - Financial Score: {}\n\
             - Health Score: {}\n\
             - Time Horizon Score: {}\n\n\
             I can provide advice and suggestions based on these scores.",
            bundle.overall_risk_score,
            bundle.finance_score,
            bundle.health_score,
            bundle.time_horizon_score
        ),
        None => WELCOME_WITH_DATA.to_string(),
    }
}
