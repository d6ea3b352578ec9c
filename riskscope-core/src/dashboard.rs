//! Score orchestration
//!
//! Turns the persisted [`DashboardData`] into a [`ScoreBundle`] and fetches
//! the per-score narrative texts. Scoring is pure; narrative fetching talks
//! to the analysis collaborator through the [`NarrativeGenerator`] seam.

use crate::error::Result;
use crate::scoring;
use crate::services::NarrativeGenerator;
use crate::types::{AnalysisNarrative, DashboardData, RiskLevel, ScoreBundle};

/// Fixed fallback used when a narrative request fails or returns nothing.
pub const FALLBACK_ANALYSIS: &str = "Analysis unavailable";

/// Derive the score bundle from whatever submissions are present.
///
/// A sub-score is computed only when its result+form pair exists; an absent
/// pair scores 0 with the "No Data" classification. That default is a
/// display-safety placeholder, not a computed judgment, and the label keeps
/// the two distinguishable.
pub fn assemble(data: &DashboardData) -> Result<ScoreBundle> {
    let health_prob = match (&data.health_result, &data.health_form) {
        (Some(_), Some(form)) => Some(scoring::cardiovascular_risk_probability(form)?),
        _ => None,
    };
    let (health_score, health_classification) = match health_prob {
        Some(p10) => (scoring::health_score(p10), scoring::classify_health_risk(p10)),
        None => (0, RiskLevel::NoData),
    };

    let fsi = data.finance_result.as_ref().map(|r| r.fsi);
    let (finance_score, finance_classification) = match fsi {
        Some(fsi) => (
            scoring::finance_score(fsi),
            scoring::classify_finance_risk(fsi),
        ),
        None => (0, RiskLevel::NoData),
    };

    let time_horizon_score = scoring::time_horizon_score(health_prob, fsi);
    let overall_risk_score = scoring::overall_score(health_score, finance_score, time_horizon_score);

    Ok(ScoreBundle {
        health_score,
        finance_score,
        time_horizon_score,
        overall_risk_score,
        health_classification,
        finance_classification,
        time_horizon_interpretation: scoring::interpret_time_horizon(time_horizon_score),
        overall_risk_interpretation: scoring::interpret_overall(overall_risk_score),
    })
}

/// Fetch the four narrative texts concurrently.
///
/// Each request fails independently to [`FALLBACK_ANALYSIS`]; a failure
/// never aborts the sibling requests, and this function itself never
/// errors. No retry; timeouts are the transport's own.
pub async fn fetch_narratives<G: NarrativeGenerator>(
    generator: &G,
    bundle: &ScoreBundle,
) -> AnalysisNarrative {
    let (health, finance, time_horizon, overall) = tokio::join!(
        narrative_or_fallback(
            generator,
            format!(
                "health score of {} (classification: {})",
                bundle.health_score,
                bundle.health_classification.as_str()
            ),
        ),
        narrative_or_fallback(
            generator,
            format!(
                "finance score of {} (classification: {})",
                bundle.finance_score,
                bundle.finance_classification.as_str()
            ),
        ),
        narrative_or_fallback(
            generator,
            format!(
                "time horizon score of {} ({})",
                bundle.time_horizon_score,
                bundle.time_horizon_interpretation.as_str()
            ),
        ),
        narrative_or_fallback(
            generator,
            format!(
                "overall risk score of {} ({})",
                bundle.overall_risk_score,
                bundle.overall_risk_interpretation.as_str()
            ),
        ),
    );

    AnalysisNarrative {
        health,
        finance,
        time_horizon,
        overall,
    }
}

async fn narrative_or_fallback<G: NarrativeGenerator>(generator: &G, description: String) -> String {
    let prompt = format!(
        "Provide a short analysis (1-2 lines) of a {}. Be concise and actionable.",
        description
    );
    match generator.generate(&prompt).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => FALLBACK_ANALYSIS.to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Narrative request failed, using fallback");
            FALLBACK_ANALYSIS.to_string()
        }
    }
}
