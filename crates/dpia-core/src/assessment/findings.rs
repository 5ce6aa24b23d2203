use serde::{Deserialize, Serialize};

use crate::assessment::profile::ProcessingProfile;
use crate::assessment::severity::severity;
use crate::messages::{Mitigation, Msg, RecommendationTopic, Text};
use crate::types::{Level, Priority, RiskCategory};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The fixed risk triggers, in generation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    SensitiveData,
    LargeScaleProcessing,
    AutomatedDecisionMaking,
    ThirdCountryTransfer,
    SystematicMonitoring,
    MissingEncryption,
    MissingAccessControls,
}

impl FindingKind {
    pub fn id(&self) -> &'static str {
        match self {
            FindingKind::SensitiveData => "risk-1",
            FindingKind::LargeScaleProcessing => "risk-2",
            FindingKind::AutomatedDecisionMaking => "risk-3",
            FindingKind::ThirdCountryTransfer => "risk-4",
            FindingKind::SystematicMonitoring => "risk-5",
            FindingKind::MissingEncryption => "risk-6",
            FindingKind::MissingAccessControls => "risk-7",
        }
    }
}

/// One identified risk. Severity is derived from likelihood and impact on
/// construction and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "FindingRecord")]
pub struct RiskFinding {
    pub id: String,
    pub category: RiskCategory,
    pub description: Text,
    pub likelihood: Level,
    pub impact: Level,
    severity: Level,
    pub mitigation: Vec<Text>,
}

impl RiskFinding {
    pub fn new(
        id: impl Into<String>,
        category: RiskCategory,
        description: Text,
        likelihood: Level,
        impact: Level,
        mitigation: Vec<Text>,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            description,
            likelihood,
            impact,
            severity: severity(likelihood, impact),
            mitigation,
        }
    }

    pub fn severity(&self) -> Level {
        self.severity
    }
}

/// Wire form of a finding. A stored severity is ignored and re-derived.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FindingRecord {
    id: String,
    category: RiskCategory,
    description: Text,
    likelihood: Level,
    impact: Level,
    #[serde(default, rename = "severity")]
    _severity: Option<Level>,
    #[serde(default)]
    mitigation: Vec<Text>,
}

impl From<FindingRecord> for RiskFinding {
    fn from(r: FindingRecord) -> Self {
        RiskFinding::new(
            r.id,
            r.category,
            r.description,
            r.likelihood,
            r.impact,
            r.mitigation,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    pub priority: Priority,
    pub title: Text,
    pub description: Text,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_basis: Option<String>,
}

impl Recommendation {
    fn fixed(id: &str, priority: Priority, topic: RecommendationTopic, legal_basis: &str) -> Self {
        Self {
            id: id.to_string(),
            priority,
            title: Msg::RecommendationTitle { topic }.into(),
            description: Msg::RecommendationBody { topic }.into(),
            legal_basis: Some(legal_basis.to_string()),
        }
    }
}

/// Output of the finding generator. Recommendations are already sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindingSet {
    pub risks: Vec<RiskFinding>,
    pub recommendations: Vec<Recommendation>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn mitigations(measures: &[Mitigation]) -> Vec<Text> {
    measures
        .iter()
        .map(|&measure| Msg::Mitigation { measure }.into())
        .collect()
}

fn finding(
    kind: FindingKind,
    category: RiskCategory,
    likelihood: Level,
    impact: Level,
    measures: &[Mitigation],
) -> RiskFinding {
    RiskFinding::new(
        kind.id(),
        category,
        Msg::Finding {
            kind,
            high_risk_jurisdiction: false,
        }
        .into(),
        likelihood,
        impact,
        mitigations(measures),
    )
}

/// Stable sort by priority, high first. Equal priorities keep their
/// generation order.
pub fn sort_recommendations(recommendations: &mut [Recommendation]) {
    recommendations.sort_by(|a, b| b.priority.cmp(&a.priority));
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Evaluate every risk trigger against the profile.
///
/// Each trigger fires at most once. `high_risk_jurisdiction` is the
/// cross-border heuristic result for the profile's transfer notes.
pub fn generate_findings(profile: &ProcessingProfile, high_risk_jurisdiction: bool) -> FindingSet {
    let mut risks = Vec::new();
    let mut recommendations = Vec::new();

    // 1. Sensitive data
    if profile.sensitive_data {
        risks.push(finding(
            FindingKind::SensitiveData,
            RiskCategory::Confidentiality,
            Level::High,
            Level::High,
            &[
                Mitigation::StrictAccessControls,
                Mitigation::EncryptAtRestAndInTransit,
                Mitigation::PseudonymiseWherePossible,
            ],
        ));
        recommendations.push(Recommendation::fixed(
            "rec-1",
            Priority::High,
            RecommendationTopic::SensitiveData,
            "Art. 22 Abs. 1 DSG",
        ));
    }

    // 2. Large-scale processing
    if profile.large_scale_processing {
        risks.push(finding(
            FindingKind::LargeScaleProcessing,
            RiskCategory::Transparency,
            Level::Medium,
            Level::High,
            &[
                Mitigation::TransparencyObligations,
                Mitigation::SafeguardDataSubjectRights,
                Mitigation::ReviewProcessingRegularly,
            ],
        ));
    }

    // 3. Automated decision-making
    if profile.automated_decision_making {
        risks.push(finding(
            FindingKind::AutomatedDecisionMaking,
            RiskCategory::Lawfulness,
            Level::Medium,
            Level::High,
            &[
                Mitigation::HumanReview,
                Mitigation::ExplainableDecisions,
                Mitigation::RightToObject,
            ],
        ));
        recommendations.push(Recommendation::fixed(
            "rec-2",
            Priority::High,
            RecommendationTopic::AutomatedDecisions,
            "Art. 21 DSG",
        ));
    }

    // 4. Third-country transfer
    if profile.third_country_transfer {
        let mut measures = vec![
            Mitigation::AdequateSafeguards,
            Mitigation::ThirdCountryRiskAssessment,
            Mitigation::DocumentTransfers,
        ];
        if high_risk_jurisdiction {
            measures.extend([
                Mitigation::TransferImpactAssessment,
                Mitigation::SupplementaryTechnicalMeasures,
                Mitigation::ConsiderAlternativeJurisdiction,
            ]);
        }
        let likelihood = if high_risk_jurisdiction {
            Level::High
        } else {
            Level::Medium
        };
        risks.push(RiskFinding::new(
            FindingKind::ThirdCountryTransfer.id(),
            RiskCategory::Confidentiality,
            Msg::Finding {
                kind: FindingKind::ThirdCountryTransfer,
                high_risk_jurisdiction,
            }
            .into(),
            likelihood,
            Level::High,
            mitigations(&measures),
        ));
        recommendations.push(Recommendation::fixed(
            "rec-3",
            Priority::High,
            RecommendationTopic::ThirdCountryTransfer,
            "Art. 16 DSG",
        ));
    }

    // 5. Systematic monitoring
    if profile.systematic_monitoring {
        risks.push(finding(
            FindingKind::SystematicMonitoring,
            RiskCategory::Transparency,
            Level::High,
            Level::Medium,
            &[
                Mitigation::InformDataSubjects,
                Mitigation::ConductImpactAssessment,
                Mitigation::ReviewNecessity,
            ],
        ));
    }

    // 6. Encryption absent
    if !profile.encryption {
        let likelihood = if profile.sensitive_data {
            Level::High
        } else {
            Level::Medium
        };
        risks.push(finding(
            FindingKind::MissingEncryption,
            RiskCategory::Confidentiality,
            likelihood,
            Level::High,
            &[Mitigation::EncryptAtRest, Mitigation::EncryptInTransit],
        ));
        recommendations.push(Recommendation::fixed(
            "rec-4",
            Priority::Medium,
            RecommendationTopic::Encryption,
            "Art. 8 DSG",
        ));
    }

    // 7. Access controls absent; surfaces as a missing measure, no recommendation
    if !profile.access_controls {
        let impact = if profile.sensitive_data || profile.large_scale_processing {
            Level::High
        } else {
            Level::Medium
        };
        risks.push(finding(
            FindingKind::MissingAccessControls,
            RiskCategory::Confidentiality,
            Level::Medium,
            impact,
            &[
                Mitigation::ImplementAccessControls,
                Mitigation::AuthorizationConcept,
                Mitigation::ReviewPermissions,
            ],
        ));
    }

    // 8. Data minimisation absent: recommendation only
    if !profile.data_minimization {
        recommendations.push(Recommendation::fixed(
            "rec-5",
            Priority::Medium,
            RecommendationTopic::DataMinimization,
            "Art. 6 Abs. 3 DSG",
        ));
    }

    sort_recommendations(&mut recommendations);

    tracing::debug!(
        risks = risks.len(),
        recommendations = recommendations.len(),
        "findings generated"
    );

    FindingSet {
        risks,
        recommendations,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// All safeguards in place, no risk factors.
    fn protected_profile() -> ProcessingProfile {
        ProcessingProfile {
            encryption: true,
            access_controls: true,
            data_minimization: true,
            pseudonymization: true,
            ..Default::default()
        }
    }

    fn ids(set: &FindingSet) -> Vec<&str> {
        set.risks.iter().map(|r| r.id.as_str()).collect()
    }

    fn find<'a>(set: &'a FindingSet, kind: FindingKind) -> &'a RiskFinding {
        set.risks
            .iter()
            .find(|r| r.id == kind.id())
            .expect("finding present")
    }

    #[test]
    fn test_protected_profile_has_no_findings() {
        let set = generate_findings(&protected_profile(), false);
        assert!(set.risks.is_empty());
        assert!(set.recommendations.is_empty());
    }

    #[test]
    fn test_generation_order() {
        let profile = ProcessingProfile {
            sensitive_data: true,
            large_scale_processing: true,
            automated_decision_making: true,
            third_country_transfer: true,
            systematic_monitoring: true,
            ..Default::default()
        };
        let set = generate_findings(&profile, false);
        assert_eq!(
            ids(&set),
            vec!["risk-1", "risk-2", "risk-3", "risk-4", "risk-5", "risk-6", "risk-7"]
        );
    }

    #[test]
    fn test_sensitive_data_finding() {
        let profile = ProcessingProfile {
            sensitive_data: true,
            ..protected_profile()
        };
        let set = generate_findings(&profile, false);
        let f = find(&set, FindingKind::SensitiveData);
        assert_eq!(f.category, RiskCategory::Confidentiality);
        assert_eq!(f.severity(), Level::High);
        assert_eq!(f.mitigation.len(), 3);
        assert_eq!(set.recommendations.len(), 1);
        assert_eq!(
            set.recommendations[0].legal_basis.as_deref(),
            Some("Art. 22 Abs. 1 DSG")
        );
    }

    #[test]
    fn test_large_scale_has_no_recommendation() {
        let profile = ProcessingProfile {
            large_scale_processing: true,
            ..protected_profile()
        };
        let set = generate_findings(&profile, false);
        assert_eq!(ids(&set), vec!["risk-2"]);
        assert_eq!(find(&set, FindingKind::LargeScaleProcessing).severity(), Level::High);
        assert!(set.recommendations.is_empty());
    }

    #[test]
    fn test_monitoring_is_high_likelihood_medium_impact() {
        let profile = ProcessingProfile {
            systematic_monitoring: true,
            ..protected_profile()
        };
        let set = generate_findings(&profile, false);
        let f = find(&set, FindingKind::SystematicMonitoring);
        assert_eq!((f.likelihood, f.impact), (Level::High, Level::Medium));
        assert_eq!(f.severity(), Level::High);
    }

    #[test]
    fn test_transfer_to_adequate_country_is_medium_likelihood() {
        let profile = ProcessingProfile {
            third_country_transfer: true,
            ..protected_profile()
        };
        let set = generate_findings(&profile, false);
        let f = find(&set, FindingKind::ThirdCountryTransfer);
        assert_eq!(f.likelihood, Level::Medium);
        assert_eq!(f.mitigation.len(), 3);
        assert_eq!(
            f.description,
            Text::from(Msg::Finding {
                kind: FindingKind::ThirdCountryTransfer,
                high_risk_jurisdiction: false,
            })
        );
    }

    #[test]
    fn test_transfer_to_high_risk_country_adds_mitigations() {
        let profile = ProcessingProfile {
            third_country_transfer: true,
            ..protected_profile()
        };
        let set = generate_findings(&profile, true);
        let f = find(&set, FindingKind::ThirdCountryTransfer);
        assert_eq!(f.likelihood, Level::High);
        assert_eq!(f.severity(), Level::High);
        assert_eq!(f.mitigation.len(), 6);
        assert_eq!(
            f.mitigation[5],
            Text::from(Msg::Mitigation {
                measure: Mitigation::ConsiderAlternativeJurisdiction
            })
        );
        assert_eq!(
            f.description,
            Text::from(Msg::Finding {
                kind: FindingKind::ThirdCountryTransfer,
                high_risk_jurisdiction: true,
            })
        );
    }

    #[test]
    fn test_missing_encryption_likelihood_follows_sensitive_data() {
        let plain = ProcessingProfile {
            encryption: false,
            ..protected_profile()
        };
        let set = generate_findings(&plain, false);
        assert_eq!(find(&set, FindingKind::MissingEncryption).likelihood, Level::Medium);

        let sensitive = ProcessingProfile {
            sensitive_data: true,
            ..plain
        };
        let set = generate_findings(&sensitive, false);
        assert_eq!(find(&set, FindingKind::MissingEncryption).likelihood, Level::High);
    }

    #[test]
    fn test_missing_access_controls_impact() {
        let plain = ProcessingProfile {
            access_controls: false,
            ..protected_profile()
        };
        let set = generate_findings(&plain, false);
        let f = find(&set, FindingKind::MissingAccessControls);
        assert_eq!(f.impact, Level::Medium);
        assert_eq!(f.severity(), Level::Medium);
        assert!(set.recommendations.is_empty());

        let large = ProcessingProfile {
            large_scale_processing: true,
            ..plain
        };
        let set = generate_findings(&large, false);
        assert_eq!(find(&set, FindingKind::MissingAccessControls).impact, Level::High);
    }

    #[test]
    fn test_missing_minimization_yields_recommendation_only() {
        let profile = ProcessingProfile {
            data_minimization: false,
            ..protected_profile()
        };
        let set = generate_findings(&profile, false);
        assert!(set.risks.is_empty());
        assert_eq!(set.recommendations.len(), 1);
        assert_eq!(set.recommendations[0].id, "rec-5");
    }

    #[test]
    fn test_recommendations_sorted_stably() {
        let profile = ProcessingProfile {
            third_country_transfer: true,
            sensitive_data: true,
            ..Default::default()
        };
        let set = generate_findings(&profile, false);
        let rec_ids: Vec<&str> = set.recommendations.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(rec_ids, vec!["rec-1", "rec-3", "rec-4", "rec-5"]);
    }

    #[test]
    fn test_sort_keeps_generation_order_within_priority() {
        let mut recs = vec![
            Recommendation::fixed("a", Priority::Low, RecommendationTopic::Encryption, "x"),
            Recommendation::fixed("b", Priority::High, RecommendationTopic::Encryption, "x"),
            Recommendation::fixed("c", Priority::Low, RecommendationTopic::Encryption, "x"),
            Recommendation::fixed("d", Priority::Medium, RecommendationTopic::Encryption, "x"),
            Recommendation::fixed("e", Priority::High, RecommendationTopic::Encryption, "x"),
        ];
        sort_recommendations(&mut recs);
        let order: Vec<&str> = recs.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(order, vec!["b", "e", "d", "a", "c"]);
    }

    #[test]
    fn test_deserialized_severity_is_rederived() {
        let json = r#"{
            "id": "risk-9",
            "category": "integrity",
            "description": "Tampered",
            "likelihood": "low",
            "impact": "low",
            "severity": "high",
            "mitigation": []
        }"#;
        let f: RiskFinding = serde_json::from_str(json).unwrap();
        assert_eq!(f.severity(), Level::Low);
    }
}
