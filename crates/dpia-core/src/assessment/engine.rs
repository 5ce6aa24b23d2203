use serde::{Deserialize, Serialize};

use crate::assessment::compliance::{decide_compliance, ComplianceStatus};
use crate::assessment::cross_border::is_high_risk_jurisdiction;
use crate::assessment::findings::{generate_findings, Recommendation, RiskFinding};
use crate::assessment::profile::ProcessingProfile;
use crate::assessment::risk_level::classify_risk;
use crate::assessment::summary::{build_summary, RiskSummary};
use crate::assessment::trace::DecisionLog;
use crate::types::Level;

/// Complete outcome of one assessment. Built once and never mutated; a
/// different verdict requires re-running the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskResult {
    pub overall_risk: Level,
    pub risks: Vec<RiskFinding>,
    pub recommendations: Vec<Recommendation>,
    pub compliance_status: ComplianceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_summary: Option<RiskSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_log: Option<DecisionLog>,
}

/// Cross-border heuristic result for the profile's transfer notes.
pub fn transfer_risk(profile: &ProcessingProfile) -> bool {
    is_high_risk_jurisdiction(
        profile.outsourcing_countries.as_deref(),
        profile.third_country_risk_notes.as_deref(),
    )
}

/// Run the local pipeline: findings, aggregate risk, compliance verdict and
/// risk summary.
///
/// Total over its input: every combination of flags and absent fields
/// produces a result. Same profile, same result, including the traces.
pub fn assess(profile: &ProcessingProfile) -> RiskResult {
    let high_risk_jurisdiction = transfer_risk(profile);

    let findings = generate_findings(profile, high_risk_jurisdiction);
    let (overall_risk, risk_calculation) = classify_risk(&findings.risks, profile);
    let (compliance_status, compliance_decision) =
        decide_compliance(overall_risk, profile, high_risk_jurisdiction);
    let risk_summary =
        build_summary(profile, &findings.risks, overall_risk, high_risk_jurisdiction);

    tracing::info!(
        overall_risk = %overall_risk,
        compliant = compliance_status.compliant,
        findings = findings.risks.len(),
        "assessment complete"
    );

    RiskResult {
        overall_risk,
        risks: findings.risks,
        recommendations: findings.recommendations,
        compliance_status,
        risk_summary: Some(risk_summary),
        decision_log: Some(DecisionLog {
            risk_calculation,
            compliance_decision,
        }),
    }
}
