//! Clients for the external collaborator services
//!
//! Four opaque collaborators sit behind plain POST endpoints: the finance
//! and health prediction models, the narrative generator, and the Q&A
//! assistant. This module owns the wire contracts and the HTTP client;
//! payloads are validated at the boundary and malformed responses are
//! rejected rather than propagated inward.
//!
//! The [`NarrativeGenerator`] and [`RiskAssistant`] traits seam the
//! orchestrator and the chat session away from HTTP so they can be tested
//! with in-process mocks.

mod client;

pub use client::ServiceClient;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Risk context sent alongside every assistant question.
///
/// The `risk`/`score` pairs come from the stored predictions (empty string /
/// zero when the model omitted them); the time-horizon pair comes from the
/// assembled score bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskContext {
    pub health_risk: String,
    pub health_score: f64,
    pub finance_risk: String,
    pub finance_score: f64,
    pub time_horizon_risk: String,
    pub time_horizon_score: f64,
}

/// Request body for the Q&A assistant endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AskRequest {
    pub input: String,
    #[serde(flatten)]
    pub context: RiskContext,
}

/// Reply from the Q&A assistant endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskReply {
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

/// Request body for the narrative generation endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct AnalysisRequest<'a> {
    pub prompt: &'a str,
}

/// Reply from the narrative generation endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct AnalysisReply {
    #[serde(default)]
    pub analysis: String,
}

/// Text-generation collaborator producing one short narrative per prompt.
pub trait NarrativeGenerator {
    fn generate(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Q&A collaborator answering a question in the user's risk context.
pub trait RiskAssistant {
    fn ask(
        &self,
        request: &AskRequest,
    ) -> impl std::future::Future<Output = Result<AskReply>> + Send;
}
