//! Core domain types for riskscope
//!
//! Two loosely related aggregates flow through the system:
//!
//! | Term | Definition |
//! |------|------------|
//! | **Profile** | A questionnaire the user fills in (finance or health) |
//! | **Prediction** | What the external model service returned for a profile |
//! | **DashboardData** | The persisted pair of profiles + predictions |
//! | **ScoreBundle** | Scores and labels derived from DashboardData |
//! | **ChatMessage** | One entry in the assistant conversation log |
//!
//! Wire field names follow the upstream model services' feature names
//! (`Credit_Score`, `sysBP`, `FSI`, ...) so serialized payloads and stored
//! documents stay byte-compatible with the services. Rust field names are
//! idiomatic; serde renames bridge the two.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

// ============================================
// Finance questionnaire
// ============================================

/// Finance risk questionnaire, submitted to the finance prediction service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceProfile {
    #[serde(rename = "Age")]
    pub age: u32,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "Education_Level")]
    pub education_level: String,
    #[serde(rename = "Marital_Status")]
    pub marital_status: String,
    #[serde(rename = "Income")]
    pub income: f64,
    #[serde(rename = "Credit_Score")]
    pub credit_score: f64,
    #[serde(rename = "Loan_Amount")]
    pub loan_amount: f64,
    #[serde(rename = "Loan_Purpose")]
    pub loan_purpose: String,
    #[serde(rename = "Employment_Status")]
    pub employment_status: String,
    #[serde(rename = "Years_at_Current_Job")]
    pub years_at_current_job: u32,
    #[serde(rename = "Payment_History")]
    pub payment_history: String,
    /// Derived from loan amount and income; recomputed before submission.
    #[serde(rename = "Debt_to_Income_Ratio", default)]
    pub debt_to_income_ratio: f64,
    #[serde(rename = "Assets_Value")]
    pub assets_value: f64,
    #[serde(rename = "Number_of_Dependents")]
    pub number_of_dependents: u32,
    #[serde(rename = "Previous_Defaults")]
    pub previous_defaults: u32,
    /// Derived from `marital_status`; recomputed before submission.
    #[serde(rename = "Marital_Status_Change", default)]
    pub marital_status_change: u32,
}

impl FinanceProfile {
    /// Validate required fields; a failure blocks submission.
    pub fn validate(&self) -> Result<()> {
        if self.age == 0 {
            return Err(Error::validation("Age", "must be greater than zero"));
        }
        if !self.income.is_finite() || self.income < 0.0 {
            return Err(Error::validation("Income", "must be a non-negative number"));
        }
        if !self.loan_amount.is_finite() || self.loan_amount < 0.0 {
            return Err(Error::validation(
                "Loan_Amount",
                "must be a non-negative number",
            ));
        }
        for (field, value) in [
            ("Gender", &self.gender),
            ("Education_Level", &self.education_level),
            ("Marital_Status", &self.marital_status),
            ("Loan_Purpose", &self.loan_purpose),
            ("Employment_Status", &self.employment_status),
            ("Payment_History", &self.payment_history),
        ] {
            if value.trim().is_empty() {
                return Err(Error::validation(field, "is required"));
            }
        }
        Ok(())
    }

    /// Recompute the derived fields and return the profile ready to submit.
    ///
    /// Debt-to-income is `loan_amount / income` (0 when income is 0), and the
    /// marital-status-change feature maps Married -> 1, Divorced -> 2, else 0.
    pub fn normalized(mut self) -> Self {
        self.debt_to_income_ratio = if self.income > 0.0 {
            self.loan_amount / self.income
        } else {
            0.0
        };
        self.marital_status_change = match self.marital_status.as_str() {
            "Married" => 1,
            "Divorced" => 2,
            _ => 0,
        };
        self
    }
}

// ============================================
// Health questionnaire
// ============================================

/// Health risk questionnaire, submitted to the health prediction service.
///
/// Field names mirror the Framingham dataset columns. The 0/1 flags stay
/// numeric on the wire; use the accessor methods for boolean views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthProfile {
    pub male: u8,
    pub age: f64,
    pub education: u32,
    #[serde(rename = "currentSmoker")]
    pub current_smoker: u8,
    #[serde(rename = "cigsPerDay")]
    pub cigs_per_day: f64,
    #[serde(rename = "BPMeds")]
    pub bp_meds: u8,
    #[serde(rename = "prevalentStroke")]
    pub prevalent_stroke: u8,
    #[serde(rename = "prevalentHyp")]
    pub prevalent_hyp: u8,
    pub diabetes: u8,
    #[serde(rename = "totChol")]
    pub tot_chol: f64,
    #[serde(rename = "sysBP")]
    pub sys_bp: f64,
    #[serde(rename = "diaBP")]
    pub dia_bp: f64,
    #[serde(rename = "BMI")]
    pub bmi: f64,
    #[serde(rename = "heartRate")]
    pub heart_rate: f64,
    pub glucose: f64,
}

impl HealthProfile {
    pub fn is_male(&self) -> bool {
        self.male == 1
    }

    pub fn is_current_smoker(&self) -> bool {
        self.current_smoker == 1
    }

    pub fn on_bp_medication(&self) -> bool {
        self.bp_meds == 1
    }

    pub fn has_diabetes(&self) -> bool {
        self.diabetes == 1
    }

    /// Validate required fields; a failure blocks submission.
    ///
    /// Age, BMI, and systolic BP must be strictly positive: the risk formula
    /// takes their natural logarithm.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("male", self.male),
            ("currentSmoker", self.current_smoker),
            ("BPMeds", self.bp_meds),
            ("prevalentStroke", self.prevalent_stroke),
            ("prevalentHyp", self.prevalent_hyp),
            ("diabetes", self.diabetes),
        ] {
            if value > 1 {
                return Err(Error::validation(field, "must be 0 or 1"));
            }
        }
        for (field, value) in [("age", self.age), ("BMI", self.bmi), ("sysBP", self.sys_bp)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::validation(field, "must be greater than zero"));
            }
        }
        Ok(())
    }
}

// ============================================
// Prediction results (typed service boundary)
// ============================================

/// Result returned by the finance prediction service.
///
/// `FSI` is required and must be a probability-like value in [0,1]; higher
/// means riskier. `risk` and `score` are optional passthrough fields some
/// model versions include, used only for the assistant context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancePrediction {
    #[serde(rename = "FSI")]
    pub fsi: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Remaining payload fields, preserved opaquely.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FinancePrediction {
    /// Reject payloads whose FSI is not a probability in [0,1].
    pub fn validate(&self) -> Result<()> {
        if !self.fsi.is_finite() || !(0.0..=1.0).contains(&self.fsi) {
            return Err(Error::upstream(
                "finance",
                format!("FSI out of range: {}", self.fsi),
            ));
        }
        Ok(())
    }
}

/// Result returned by the health prediction service.
///
/// The payload shape is model-defined; `risk` and `score` are the recognized
/// passthrough fields. An empty object does not confirm a successful
/// prediction and is rejected at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthPrediction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Remaining payload fields, preserved opaquely.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl HealthPrediction {
    pub fn confirms_success(&self) -> bool {
        self.risk.is_some() || self.score.is_some() || !self.extra.is_empty()
    }
}

// ============================================
// Dashboard document
// ============================================

/// The persisted risk-assessment session: submitted forms plus their
/// prediction results. Stored as one opaque JSON document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardData {
    #[serde(rename = "financeResult", skip_serializing_if = "Option::is_none")]
    pub finance_result: Option<FinancePrediction>,
    #[serde(rename = "healthResult", skip_serializing_if = "Option::is_none")]
    pub health_result: Option<HealthPrediction>,
    #[serde(rename = "financeForm", skip_serializing_if = "Option::is_none")]
    pub finance_form: Option<FinanceProfile>,
    #[serde(rename = "healthForm", skip_serializing_if = "Option::is_none")]
    pub health_form: Option<HealthProfile>,
}

impl DashboardData {
    /// True when both prediction sides are present and carry at least a risk
    /// label or a score. The assistant requires this before answering.
    pub fn has_complete_results(&self) -> bool {
        let finance_ok = self
            .finance_result
            .as_ref()
            .is_some_and(|r| r.risk.is_some() || r.score.is_some());
        let health_ok = self
            .health_result
            .as_ref()
            .is_some_and(|r| r.risk.is_some() || r.score.is_some());
        finance_ok && health_ok
    }
}

// ============================================
// Derived scores
// ============================================

/// Three-level risk classification, plus the display-safety default used
/// when a submission pair is absent. "No Data" is not a risk judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "High Risk")]
    High,
    #[serde(rename = "No Data")]
    NoData,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
            RiskLevel::NoData => "No Data",
        }
    }
}

/// Interpretation of the time-horizon score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeHorizonBand {
    #[serde(rename = "Long-term safe zone")]
    LongTerm,
    #[serde(rename = "Moderate horizon")]
    Moderate,
    #[serde(rename = "Short horizon")]
    Short,
}

impl TimeHorizonBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeHorizonBand::LongTerm => "Long-term safe zone",
            TimeHorizonBand::Moderate => "Moderate horizon",
            TimeHorizonBand::Short => "Short horizon",
        }
    }
}

/// Interpretation of the overall composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallBand {
    #[serde(rename = "Low Overall Risk (Safe)")]
    Low,
    #[serde(rename = "Medium Overall Risk")]
    Medium,
    #[serde(rename = "High Overall Risk")]
    High,
}

impl OverallBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallBand::Low => "Low Overall Risk (Safe)",
            OverallBand::Medium => "Medium Overall Risk",
            OverallBand::High => "High Overall Risk",
        }
    }
}

/// Scores and labels derived from [`DashboardData`].
///
/// Immutable once computed: recompute from the inputs rather than mutating
/// individual fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBundle {
    pub health_score: u8,
    pub finance_score: u8,
    pub time_horizon_score: u8,
    pub overall_risk_score: u8,
    pub health_classification: RiskLevel,
    pub finance_classification: RiskLevel,
    pub time_horizon_interpretation: TimeHorizonBand,
    pub overall_risk_interpretation: OverallBand,
}

/// Per-score narrative text from the analysis service, with independent
/// fallbacks on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisNarrative {
    pub health: String,
    pub finance: String,
    pub time_horizon: String,
    pub overall: String,
}

// ============================================
// Chat log
// ============================================

/// Author of a chat log entry.
///
/// `Loading` marks the transient placeholder shown while a reply is pending;
/// it never reaches the stored log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    Loading,
}

/// One entry in the assistant conversation log. Append-only; insertion order
/// is meaningful and preserved across reloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    #[serde(rename = "type")]
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            sources: Vec::new(),
        }
    }

    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.sources = sources;
        self
    }
}
