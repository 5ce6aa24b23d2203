use serde::{Deserialize, Serialize};

use crate::assessment::profile::ProcessingProfile;
use crate::assessment::trace::{ComplianceDecision, DecisionStep, Factor, Impact};
use crate::messages::Msg;
use crate::types::Level;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Issues raised against Art. 22 DSG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceIssue {
    SensitiveDataRequiresEncryption,
    HighRiskMissingCriticalMeasures,
    HighRiskRequiresAdditionalMeasures,
    /// Advisory only; never affects the verdict.
    LargeScaleRequiresMinimization,
    /// Art. 16 DSG transfer safeguards.
    HighRiskTransferRequiresEncryption,
}

/// Pass/fail verdict against Art. 22 DSG plus the issues that explain it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceStatus {
    #[serde(rename = "art22")]
    pub compliant: bool,
    pub issues: Vec<ComplianceIssue>,
}

/// Accumulates the verdict while the checks run. The verdict can only move
/// from compliant to non-compliant; the first failing check's reasoning is
/// kept as the overall reasoning.
struct Verdict {
    compliant: bool,
    issues: Vec<ComplianceIssue>,
    checks: Vec<DecisionStep>,
    failure_reasoning: Option<Msg>,
    level_reasoning: Option<Msg>,
}

impl Verdict {
    fn new() -> Self {
        Self {
            compliant: true,
            issues: Vec::new(),
            checks: Vec::new(),
            failure_reasoning: None,
            level_reasoning: None,
        }
    }

    fn fail(
        &mut self,
        factor: Factor,
        value: impl ToString,
        issue: ComplianceIssue,
        reasoning: Msg,
    ) {
        self.compliant = false;
        self.issues.push(issue);
        if self.failure_reasoning.is_none() {
            self.failure_reasoning = Some(reasoning.clone());
        }
        self.checks
            .push(DecisionStep::new(factor, value, Impact::NonCompliant, reasoning));
    }

    fn note(&mut self, step: DecisionStep) {
        self.checks.push(step);
    }

    fn finish(self) -> (ComplianceStatus, ComplianceDecision) {
        let reasoning = self
            .failure_reasoning
            .or(self.level_reasoning)
            .unwrap_or(Msg::VerdictSummary {
                compliant: self.compliant,
            });
        (
            ComplianceStatus {
                compliant: self.compliant,
                issues: self.issues,
            },
            ComplianceDecision {
                checks: self.checks,
                reasoning,
            },
        )
    }
}

// ---------------------------------------------------------------------------
// Cascade
// ---------------------------------------------------------------------------

/// Decide Art. 22 DSG compliance for an already classified risk level.
///
/// `high_risk_jurisdiction` is the cross-border heuristic result. A high
/// overall risk is never compliant, even with every safeguard in place.
pub fn decide_compliance(
    risk_level: Level,
    profile: &ProcessingProfile,
    high_risk_jurisdiction: bool,
) -> (ComplianceStatus, ComplianceDecision) {
    let mut verdict = Verdict::new();
    let sensitive_unencrypted = profile.sensitive_data && !profile.encryption;

    if sensitive_unencrypted {
        verdict.fail(
            Factor::SensitiveDataEncryption,
            false,
            ComplianceIssue::SensitiveDataRequiresEncryption,
            Msg::SensitiveDataUnencrypted,
        );
    }

    match risk_level {
        Level::High => {
            let missing = profile.missing_critical_safeguards();
            if !missing.is_empty() {
                verdict.fail(
                    Factor::RiskLevel,
                    risk_level,
                    ComplianceIssue::HighRiskMissingCriticalMeasures,
                    Msg::HighRiskMissingMeasures { missing },
                );
            } else {
                verdict.fail(
                    Factor::RiskLevel,
                    risk_level,
                    ComplianceIssue::HighRiskRequiresAdditionalMeasures,
                    Msg::HighRiskNeverCompliant,
                );
            }
        }
        Level::Medium => {
            if sensitive_unencrypted {
                verdict.fail(
                    Factor::RiskLevel,
                    risk_level,
                    ComplianceIssue::SensitiveDataRequiresEncryption,
                    Msg::MediumRiskSensitiveUnencrypted,
                );
            } else {
                verdict.level_reasoning = Some(Msg::MediumRiskCompliant);
                verdict.note(DecisionStep::new(
                    Factor::RiskLevel,
                    risk_level,
                    Impact::Compliant,
                    Msg::MediumRiskCompliant,
                ));
            }
        }
        Level::Low => {
            // An earlier failure stands; the level alone neither helps nor hurts.
            let impact = if verdict.compliant {
                Impact::Compliant
            } else {
                Impact::Neutral
            };
            verdict.level_reasoning = Some(Msg::LowRiskMeetsRequirements);
            verdict.note(DecisionStep::new(
                Factor::RiskLevel,
                risk_level,
                impact,
                Msg::LowRiskMeetsRequirements,
            ));
        }
    }

    if profile.large_scale_processing && !profile.data_minimization {
        verdict
            .issues
            .push(ComplianceIssue::LargeScaleRequiresMinimization);
        verdict.note(DecisionStep::new(
            Factor::LargeScaleMinimization,
            false,
            Impact::Note,
            Msg::LargeScaleWithoutMinimization,
        ));
    }

    if profile.third_country_transfer && high_risk_jurisdiction && !profile.encryption {
        verdict.fail(
            Factor::ThirdCountryTransfer,
            true,
            ComplianceIssue::HighRiskTransferRequiresEncryption,
            Msg::HighRiskTransferUnencrypted,
        );
    }

    // The effect of automated decisions without profiling information on the
    // verdict is undefined; record it without deciding anything.
    if profile.automated_decision_making && !profile.profiling {
        tracing::debug!("automated decision-making without profiling left unassessed");
        verdict.note(DecisionStep::new(
            Factor::AutomatedDecisionProfiling,
            false,
            Impact::NotAssessed,
            Msg::AutomatedDecisionWithoutProfiling,
        ));
    }

    let (status, decision) = verdict.finish();
    tracing::debug!(
        compliant = status.compliant,
        issues = status.issues.len(),
        "compliance decided"
    );
    (status, decision)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
