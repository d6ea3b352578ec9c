//! HTTP client for the prediction, narrative, and assistant services

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use crate::config::ServicesConfig;
use crate::error::{Error, Result};
use crate::types::{FinancePrediction, FinanceProfile, HealthPrediction, HealthProfile};

use super::{AnalysisReply, AnalysisRequest, AskReply, AskRequest, NarrativeGenerator, RiskAssistant};

/// Error body shape shared by the collaborator services on non-2xx.
#[derive(Debug, Deserialize)]
struct ErrorReply {
    #[serde(default)]
    message: String,
}

/// HTTP client for all four collaborator endpoints.
pub struct ServiceClient {
    config: ServicesConfig,
    http_client: reqwest::Client,
}

impl ServiceClient {
    /// Create a new client from configuration
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: ServicesConfig) -> Result<Self> {
        config.validate()?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Submit a finance questionnaire for prediction.
    ///
    /// The profile is normalized (derived fields recomputed) and validated
    /// before it goes on the wire; the returned FSI must lie in [0,1].
    pub async fn predict_finance(&self, profile: &FinanceProfile) -> Result<FinancePrediction> {
        let payload = profile.clone().normalized();
        payload.validate()?;

        let prediction: FinancePrediction = self
            .post_json("finance", &self.config.finance_url, &payload)
            .await?;
        prediction.validate()?;
        Ok(prediction)
    }

    /// Submit a health questionnaire for prediction.
    pub async fn predict_health(&self, profile: &HealthProfile) -> Result<HealthPrediction> {
        profile.validate()?;

        let prediction: HealthPrediction = self
            .post_json("health", &self.config.health_url, profile)
            .await?;
        if !prediction.confirms_success() {
            return Err(Error::upstream(
                "health",
                "prediction payload was empty".to_string(),
            ));
        }
        Ok(prediction)
    }

    /// POST a JSON body and parse the JSON reply, mapping non-2xx statuses
    /// to an upstream error carrying the service's `message` field when
    /// one is present.
    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        service: &str,
        url: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .http_client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::upstream(service, format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| Error::upstream(service, format!("failed to parse response: {}", e)))
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            let message = serde_json::from_str::<ErrorReply>(&body)
                .ok()
                .filter(|reply| !reply.message.is_empty())
                .map_or(body, |reply| reply.message);
            Err(Error::upstream(
                service,
                format!("API error ({}): {}", status, message),
            ))
        }
    }
}

impl NarrativeGenerator for ServiceClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let reply: AnalysisReply = self
            .post_json(
                "analysis",
                &self.config.analysis_url,
                &AnalysisRequest { prompt },
            )
            .await?;
        Ok(reply.analysis)
    }
}

impl RiskAssistant for ServiceClient {
    async fn ask(&self, request: &AskRequest) -> Result<AskReply> {
        self.post_json("assistant", &self.config.ask_url, request)
            .await
    }
}
