//! Risk scoring model.
//!
//! Pure, deterministic functions: the Framingham-style cardiovascular risk
//! probability, the score derivations on top of it and the financial
//! stability index, and the classification tables. Nothing here touches the
//! network or the store, and nothing is random; identical inputs produce
//! byte-identical outputs.
//!
//! Scores are integers in [0,100] where higher is safer; probabilities are
//! `f64` in [0,1] where higher is riskier.

use crate::error::{Error, Result};
use crate::types::{HealthProfile, OverallBand, RiskLevel, TimeHorizonBand};

/// Sex-specific coefficient set for the simplified Framingham CVD model.
struct Coefficients {
    beta0: f64,
    ln_age: f64,
    ln_bmi: f64,
    ln_sbp_treated: f64,
    ln_sbp_untreated: f64,
    smoker: f64,
    diabetes: f64,
    l_mean: f64,
    s0: f64,
}

const MALE: Coefficients = Coefficients {
    beta0: -29.799,
    ln_age: 4.884,
    ln_bmi: 0.645,
    ln_sbp_treated: 2.019,
    ln_sbp_untreated: 1.957,
    smoker: 0.549,
    diabetes: 0.645,
    l_mean: 61.18,
    s0: 0.88431,
};

const FEMALE: Coefficients = Coefficients {
    beta0: -29.067,
    ln_age: 4.276,
    ln_bmi: 0.302,
    ln_sbp_treated: 2.469,
    ln_sbp_untreated: 2.323,
    smoker: 0.691,
    diabetes: 0.874,
    l_mean: 26.1931,
    s0: 0.95012,
};

/// Ten-year cardiovascular event probability for a health profile.
///
/// ```text
/// L   = b0 + bAge*ln(age) + bBMI*ln(BMI) + bSBP*ln(sysBP)
///       + bSmoker*currentSmoker + bDiabetes*diabetes
/// p10 = 1 - S0 ^ exp(L - Lmean)
/// ```
///
/// The treated-SBP coefficient applies when the profile reports blood
/// pressure medication. Age, BMI, and systolic BP must be strictly positive
/// (the logarithm is undefined otherwise); the output is clamped into [0,1]
/// to guard against extrapolation outside the model's calibration range.
pub fn cardiovascular_risk_probability(profile: &HealthProfile) -> Result<f64> {
    for (field, value) in [
        ("age", profile.age),
        ("BMI", profile.bmi),
        ("sysBP", profile.sys_bp),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::validation(field, "must be greater than zero"));
        }
    }

    let coeff = if profile.is_male() { &MALE } else { &FEMALE };
    let ln_sbp = if profile.on_bp_medication() {
        coeff.ln_sbp_treated
    } else {
        coeff.ln_sbp_untreated
    };

    let l = coeff.beta0
        + coeff.ln_age * profile.age.ln()
        + coeff.ln_bmi * profile.bmi.ln()
        + ln_sbp * profile.sys_bp.ln()
        + coeff.smoker * f64::from(profile.current_smoker)
        + coeff.diabetes * f64::from(profile.diabetes);

    let p10 = 1.0 - coeff.s0.powf((l - coeff.l_mean).exp());
    Ok(p10.clamp(0.0, 1.0))
}

/// Classify a ten-year cardiovascular probability.
///
/// Strict less-than comparisons: a value exactly on a boundary falls into
/// the higher bucket.
pub fn classify_health_risk(p10: f64) -> RiskLevel {
    if p10 < 0.05 {
        RiskLevel::Low
    } else if p10 < 0.15 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// Classify a financial stability index.
pub fn classify_finance_risk(fsi: f64) -> RiskLevel {
    if fsi < 0.3 {
        RiskLevel::Low
    } else if fsi < 0.7 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// `round(100 * (1 - p10))`.
pub fn health_score(p10: f64) -> u8 {
    (100.0 * (1.0 - p10)).round() as u8
}

/// `round(100 * (1 - fsi))`.
///
/// Precondition: `fsi` lies in [0,1], validated at the service boundary.
/// Out-of-range input is not clamped here.
pub fn finance_score(fsi: f64) -> u8 {
    (100.0 * (1.0 - fsi)).round() as u8
}

/// Score derived from the average of the two risk probabilities.
///
/// An absent side contributes probability 0 to the average, which skews the
/// result favorably when only one assessment was submitted. Inherited
/// convention, preserved deliberately.
pub fn time_horizon_score(health_prob: Option<f64>, finance_prob: Option<f64>) -> u8 {
    let avg = (health_prob.unwrap_or(0.0) + finance_prob.unwrap_or(0.0)) / 2.0;
    (100.0 * (1.0 - avg)).round() as u8
}

/// Interpret a time-horizon score.
pub fn interpret_time_horizon(score: u8) -> TimeHorizonBand {
    if score >= 70 {
        TimeHorizonBand::LongTerm
    } else if score >= 40 {
        TimeHorizonBand::Moderate
    } else {
        TimeHorizonBand::Short
    }
}

/// Weighted composite: `round(0.4*health + 0.4*finance + 0.2*time_horizon)`.
/// Weights are fixed.
pub fn overall_score(health: u8, finance: u8, time_horizon: u8) -> u8 {
    let weighted =
        0.4 * f64::from(health) + 0.4 * f64::from(finance) + 0.2 * f64::from(time_horizon);
    weighted.round() as u8
}

/// Interpret an overall composite score.
pub fn interpret_overall(score: u8) -> OverallBand {
    if score >= 80 {
        OverallBand::Low
    } else if score >= 50 {
        OverallBand::Medium
    } else {
        OverallBand::High
    }
}
