use serde::{Deserialize, Serialize};

use crate::messages::Msg;
use crate::types::Level;

/// What a decision step looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    HighSeverityRisks,
    MediumSeverityRisks,
    CriticalFactors,
    MissingCriticalMeasures,
    RiskRule,
    ExternalClassification,
    SensitiveDataEncryption,
    RiskLevel,
    LargeScaleMinimization,
    ThirdCountryTransfer,
    AutomatedDecisionProfiling,
}

/// Effect a decision step had on the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    RaisesRisk,
    Neutral,
    OverallRisk(Level),
    NonCompliant,
    Compliant,
    Note,
    NotAssessed,
}

/// One recorded rule evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionStep {
    pub factor: Factor,
    pub value: String,
    pub impact: Impact,
    pub reasoning: Msg,
}

impl DecisionStep {
    pub fn new(factor: Factor, value: impl ToString, impact: Impact, reasoning: Msg) -> Self {
        Self {
            factor,
            value: value.to_string(),
            impact,
            reasoning,
        }
    }
}

/// Trace of the aggregate risk cascade together with the counters it used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskCalculation {
    pub high_severity_risks: usize,
    pub medium_severity_risks: usize,
    pub total_risks: usize,
    pub critical_factors: usize,
    /// Missing critical safeguards (encryption, access controls).
    pub missing_measures: usize,
    pub steps: Vec<DecisionStep>,
    pub reasoning: Msg,
}

/// Trace of the compliance cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceDecision {
    pub checks: Vec<DecisionStep>,
    pub reasoning: Msg,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionLog {
    pub risk_calculation: RiskCalculation,
    pub compliance_decision: ComplianceDecision,
}
