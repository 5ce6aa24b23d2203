use serde::{Deserialize, Serialize};

use crate::assessment::findings::RiskFinding;
use crate::assessment::profile::{CriticalFactor, ProcessingProfile};
use crate::messages::Msg;
use crate::types::{Level, Safeguard};

/// Drivers derived from findings are capped to this many entries.
const MAX_FINDING_DRIVERS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingMeasure {
    pub measure: Safeguard,
    pub impact: Msg,
    pub recommendation: Msg,
}

impl MissingMeasure {
    fn of(safeguard: Safeguard) -> Self {
        Self {
            measure: safeguard,
            impact: Msg::MissingSafeguardImpact { safeguard },
            recommendation: Msg::MissingSafeguardAdvice { safeguard },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSummary {
    pub risk_explanation: Msg,
    pub missing_measures: Vec<MissingMeasure>,
    pub risk_drivers: Vec<Msg>,
}

/// Absent safeguards; pseudonymisation only counts when sensitive data is
/// processed.
pub fn missing_measures(profile: &ProcessingProfile) -> Vec<MissingMeasure> {
    let mut missing = Vec::new();
    for safeguard in [
        Safeguard::Encryption,
        Safeguard::AccessControls,
        Safeguard::DataMinimization,
    ] {
        if !profile.has_safeguard(safeguard) {
            missing.push(MissingMeasure::of(safeguard));
        }
    }
    if profile.sensitive_data && !profile.pseudonymization {
        missing.push(MissingMeasure::of(Safeguard::Pseudonymization));
    }
    missing
}

/// One driver per active critical factor. Without any, the highest-severity
/// findings stand in, up to three of them.
pub fn risk_drivers(
    profile: &ProcessingProfile,
    findings: &[RiskFinding],
    high_risk_jurisdiction: bool,
) -> Vec<Msg> {
    let drivers: Vec<Msg> = profile
        .critical_factors()
        .into_iter()
        .map(|factor| Msg::Driver {
            factor,
            high_risk_jurisdiction: factor == CriticalFactor::ThirdCountryTransfer
                && high_risk_jurisdiction,
        })
        .collect();
    if !drivers.is_empty() {
        return drivers;
    }

    let mut ranked: Vec<&RiskFinding> = findings.iter().collect();
    ranked.sort_by(|a, b| b.severity().cmp(&a.severity()));
    ranked
        .into_iter()
        .take(MAX_FINDING_DRIVERS)
        .map(|f| Msg::FindingDriver {
            description: Box::new(f.description.clone()),
            severity: f.severity(),
        })
        .collect()
}

/// Build the risk summary from already computed results.
pub fn build_summary(
    profile: &ProcessingProfile,
    findings: &[RiskFinding],
    overall_risk: Level,
    high_risk_jurisdiction: bool,
) -> RiskSummary {
    let missing_measures = missing_measures(profile);
    let risk_drivers = risk_drivers(profile, findings, high_risk_jurisdiction);
    let high_count = findings
        .iter()
        .filter(|f| f.severity() == Level::High)
        .count();

    let risk_explanation = Msg::RiskExplanation {
        level: overall_risk,
        drivers: risk_drivers.clone(),
        finding_count: findings.len(),
        high_count,
        missing: missing_measures.iter().map(|m| m.measure).collect(),
    };

    RiskSummary {
        risk_explanation,
        missing_measures,
        risk_drivers,
    }
}
