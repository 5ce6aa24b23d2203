//! Language-agnostic message codes.
//!
//! The engine never produces display strings. Every explanation, issue and
//! trace entry is a [`Msg`] carrying its interpolation parameters; a
//! [`crate::render::Catalog`] turns them into text for a given locale.

use serde::{Deserialize, Serialize};

use crate::assessment::findings::FindingKind;
use crate::assessment::profile::CriticalFactor;
use crate::assessment::risk_level::RiskRule;
use crate::types::{Level, Safeguard};

/// Prose that is either engine-generated (a message code) or free text
/// supplied by an external classification.
///
/// Serialized untagged: plain text as a JSON string, codes as an object
/// with a `code` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Text {
    Plain(String),
    Code(Box<Msg>),
}

impl From<Msg> for Text {
    fn from(msg: Msg) -> Self {
        Text::Code(Box::new(msg))
    }
}

impl From<String> for Text {
    fn from(s: String) -> Self {
        Text::Plain(s)
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Text::Plain(s.to_string())
    }
}

/// Mitigation measures attached to findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mitigation {
    StrictAccessControls,
    EncryptAtRestAndInTransit,
    PseudonymiseWherePossible,
    TransparencyObligations,
    SafeguardDataSubjectRights,
    ReviewProcessingRegularly,
    HumanReview,
    ExplainableDecisions,
    RightToObject,
    AdequateSafeguards,
    ThirdCountryRiskAssessment,
    DocumentTransfers,
    TransferImpactAssessment,
    SupplementaryTechnicalMeasures,
    ConsiderAlternativeJurisdiction,
    InformDataSubjects,
    ConductImpactAssessment,
    ReviewNecessity,
    EncryptAtRest,
    EncryptInTransit,
    ImplementAccessControls,
    AuthorizationConcept,
    ReviewPermissions,
}

/// Subjects of the fixed recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationTopic {
    SensitiveData,
    AutomatedDecisions,
    ThirdCountryTransfer,
    Encryption,
    DataMinimization,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum Msg {
    // --- findings and recommendations ---
    Finding {
        kind: FindingKind,
        high_risk_jurisdiction: bool,
    },
    Mitigation {
        measure: Mitigation,
    },
    RecommendationTitle {
        topic: RecommendationTopic,
    },
    RecommendationBody {
        topic: RecommendationTopic,
    },

    // --- risk calculation trace ---
    HighSeverityCount {
        count: usize,
        findings: Vec<Text>,
    },
    MediumSeverityCount {
        count: usize,
        findings: Vec<Text>,
    },
    CriticalFactorCount {
        count: usize,
        factors: Vec<CriticalFactor>,
    },
    MissingCriticalCount {
        count: usize,
        missing: Vec<Safeguard>,
    },
    RiskRuleMatched {
        rule: RiskRule,
        level: Level,
        high_count: usize,
        medium_count: usize,
        total: usize,
        critical_factors: usize,
        missing_critical: usize,
        findings: Vec<Text>,
    },
    ExternalRiskAccepted {
        level: Level,
        total: usize,
    },

    // --- compliance trace ---
    SensitiveDataUnencrypted,
    HighRiskMissingMeasures {
        missing: Vec<Safeguard>,
    },
    HighRiskNeverCompliant,
    MediumRiskSensitiveUnencrypted,
    MediumRiskCompliant,
    LowRiskMeetsRequirements,
    LargeScaleWithoutMinimization,
    HighRiskTransferUnencrypted,
    AutomatedDecisionWithoutProfiling,
    VerdictSummary {
        compliant: bool,
    },

    // --- risk summary ---
    MissingSafeguardImpact {
        safeguard: Safeguard,
    },
    MissingSafeguardAdvice {
        safeguard: Safeguard,
    },
    Driver {
        factor: CriticalFactor,
        high_risk_jurisdiction: bool,
    },
    FindingDriver {
        description: Box<Text>,
        severity: Level,
    },
    RiskExplanation {
        level: Level,
        drivers: Vec<Msg>,
        finding_count: usize,
        high_count: usize,
        missing: Vec<Safeguard>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_text_serializes_as_string() {
        let text = Text::from("Vendor lock-in");
        assert_eq!(serde_json::to_string(&text).unwrap(), "\"Vendor lock-in\"");
    }

    #[test]
    fn test_code_text_serializes_as_tagged_object() {
        let text = Text::from(Msg::Mitigation {
            measure: Mitigation::HumanReview,
        });
        let value = serde_json::to_value(&text).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"code": "mitigation", "measure": "human_review"})
        );
    }

    #[test]
    fn test_nested_message_round_trip() {
        let msg = Msg::RiskExplanation {
            level: Level::High,
            drivers: vec![
                Msg::Driver {
                    factor: CriticalFactor::SensitiveData,
                    high_risk_jurisdiction: false,
                },
                Msg::FindingDriver {
                    description: Box::new(Text::from("free text")),
                    severity: Level::Medium,
                },
            ],
            finding_count: 2,
            high_count: 1,
            missing: vec![Safeguard::Encryption],
        };
        let json = serde_json::to_string(&msg).unwrap();
        let back: Msg = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
