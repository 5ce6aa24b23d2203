//! Message catalogs.
//!
//! A [`Catalog`] turns message codes into display text. Only English ships
//! with the engine; other locales implement the same trait.

use serde::{Deserialize, Serialize};

use crate::assessment::compliance::ComplianceIssue;
use crate::assessment::engine::RiskResult;
use crate::assessment::findings::FindingKind;
use crate::assessment::profile::CriticalFactor;
use crate::assessment::risk_level::RiskRule;
use crate::assessment::trace::{DecisionStep, Factor, Impact};
use crate::messages::{Mitigation, Msg, RecommendationTopic, Text};
use crate::types::{Level, Priority, RiskCategory, Safeguard};

// ---------------------------------------------------------------------------
// Catalog trait
// ---------------------------------------------------------------------------

pub trait Catalog {
    fn level(&self, level: Level) -> &'static str;

    fn render(&self, msg: &Msg) -> String;

    fn priority(&self, priority: Priority) -> &'static str;

    fn category(&self, category: RiskCategory) -> &'static str;

    fn issue(&self, issue: ComplianceIssue) -> &'static str;

    fn safeguard(&self, safeguard: Safeguard) -> &'static str;

    fn factor(&self, factor: Factor) -> &'static str;

    fn impact(&self, impact: Impact) -> String;

    fn text(&self, text: &Text) -> String {
        match text {
            Text::Plain(s) => s.clone(),
            Text::Code(msg) => self.render(msg),
        }
    }
}

// ---------------------------------------------------------------------------
// English
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishCatalog;

fn join<I>(items: I) -> String
where
    I: IntoIterator<Item = String>,
{
    items.into_iter().collect::<Vec<_>>().join(", ")
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

impl EnglishCatalog {
    fn critical_factor(&self, factor: CriticalFactor) -> &'static str {
        match factor {
            CriticalFactor::SensitiveData => "sensitive personal data",
            CriticalFactor::ThirdCountryTransfer => "third-country transfer",
            CriticalFactor::AutomatedDecisionMaking => "automated decision-making",
            CriticalFactor::LargeScaleProcessing => "large-scale processing",
            CriticalFactor::SystematicMonitoring => "systematic monitoring",
        }
    }

    fn finding(&self, kind: FindingKind, high_risk_jurisdiction: bool) -> &'static str {
        match kind {
            FindingKind::SensitiveData => "Processing of sensitive personal data",
            FindingKind::LargeScaleProcessing => "Large-scale processing of personal data",
            FindingKind::AutomatedDecisionMaking => "Automated individual decision-making",
            FindingKind::ThirdCountryTransfer if high_risk_jurisdiction => {
                "Transfer of personal data to a high-risk third country"
            }
            FindingKind::ThirdCountryTransfer => "Transfer of personal data to third countries",
            FindingKind::SystematicMonitoring => "Systematic monitoring of data subjects",
            FindingKind::MissingEncryption => "Missing encryption",
            FindingKind::MissingAccessControls => "Missing access controls",
        }
    }

    fn mitigation(&self, measure: Mitigation) -> &'static str {
        match measure {
            Mitigation::StrictAccessControls => "Implement strict access controls",
            Mitigation::EncryptAtRestAndInTransit => "Encrypt data at rest and in transit",
            Mitigation::PseudonymiseWherePossible => "Pseudonymise data where possible",
            Mitigation::TransparencyObligations => "Meet transparency and information duties",
            Mitigation::SafeguardDataSubjectRights => "Safeguard data subject rights",
            Mitigation::ReviewProcessingRegularly => "Review the processing regularly",
            Mitigation::HumanReview => "Ensure human review of decisions",
            Mitigation::ExplainableDecisions => "Make decisions explainable",
            Mitigation::RightToObject => "Provide a right to object",
            Mitigation::AdequateSafeguards => {
                "Ensure adequate safeguards (e.g. standard contractual clauses)"
            }
            Mitigation::ThirdCountryRiskAssessment => "Assess the risks of the destination country",
            Mitigation::DocumentTransfers => "Document all transfers",
            Mitigation::TransferImpactAssessment => "Carry out a transfer impact assessment",
            Mitigation::SupplementaryTechnicalMeasures => {
                "Add supplementary technical measures such as end-to-end encryption"
            }
            Mitigation::ConsiderAlternativeJurisdiction => {
                "Consider processing in an adequate jurisdiction instead"
            }
            Mitigation::InformDataSubjects => "Inform data subjects transparently",
            Mitigation::ConductImpactAssessment => "Conduct a data protection impact assessment",
            Mitigation::ReviewNecessity => "Review the necessity of monitoring regularly",
            Mitigation::EncryptAtRest => "Encrypt data at rest",
            Mitigation::EncryptInTransit => "Encrypt data in transit",
            Mitigation::ImplementAccessControls => "Implement access controls",
            Mitigation::AuthorizationConcept => "Define an authorisation concept",
            Mitigation::ReviewPermissions => "Review permissions regularly",
        }
    }

    fn recommendation_title(&self, topic: RecommendationTopic) -> &'static str {
        match topic {
            RecommendationTopic::SensitiveData => "Special protection for sensitive data",
            RecommendationTopic::AutomatedDecisions => "Transparency of automated decisions",
            RecommendationTopic::ThirdCountryTransfer => "Review third-country transfers",
            RecommendationTopic::Encryption => "Implement encryption",
            RecommendationTopic::DataMinimization => "Apply data minimisation",
        }
    }

    fn recommendation_body(&self, topic: RecommendationTopic) -> &'static str {
        match topic {
            RecommendationTopic::SensitiveData => {
                "Processing sensitive personal data requires additional technical and \
                 organisational measures."
            }
            RecommendationTopic::AutomatedDecisions => {
                "Data subjects must be informed of automated decisions and be able to \
                 object to them."
            }
            RecommendationTopic::ThirdCountryTransfer => {
                "Transfers to third countries require adequate safeguards under Art. 16 DSG."
            }
            RecommendationTopic::Encryption => {
                "Encryption is a key technical measure for protecting personal data."
            }
            RecommendationTopic::DataMinimization => {
                "Only process the personal data necessary for the stated purpose."
            }
        }
    }

    fn texts(&self, texts: &[Text]) -> String {
        join(texts.iter().map(|t| self.text(t)))
    }

    fn with_list(&self, head: String, list: String) -> String {
        if list.is_empty() {
            head
        } else {
            format!("{}: {}", head, list)
        }
    }

    fn rule(
        &self,
        rule: RiskRule,
        high: usize,
        medium: usize,
        total: usize,
        cf: usize,
        missing: usize,
    ) -> String {
        match rule {
            RiskRule::MultipleHighSeverity => format!(
                "{} result in a high overall risk",
                plural(high, "high-severity risk", "high-severity risks")
            ),
            RiskRule::HighSeverityWithSevereContext => format!(
                "A high-severity risk combined with {} or {} results in a high overall risk",
                plural(cf, "critical factor", "critical factors"),
                plural(missing, "missing critical safeguard", "missing critical safeguards")
            ),
            RiskRule::HighSeverityWithElevatedContext => format!(
                "A high-severity risk combined with {} or {} results in a high overall risk",
                plural(cf, "critical factor", "critical factors"),
                plural(missing, "missing critical safeguard", "missing critical safeguards")
            ),
            RiskRule::SingleHighSeverity => {
                "A single high-severity risk without aggravating context results in a \
                 medium overall risk"
                    .to_string()
            }
            RiskRule::ManyMediumWithCriticalFactors => format!(
                "{} together with {} result in a high overall risk",
                plural(medium, "medium-severity risk", "medium-severity risks"),
                plural(cf, "critical factor", "critical factors")
            ),
            RiskRule::SeveralMedium => format!(
                "{} result in a medium overall risk",
                plural(medium, "medium-severity risk", "medium-severity risks")
            ),
            RiskRule::ManyFindingsWithCriticalFactors => format!(
                "{} together with {} result in a medium overall risk",
                plural(total, "identified risk", "identified risks"),
                plural(cf, "critical factor", "critical factors")
            ),
            RiskRule::Baseline => format!(
                "{} without aggravating factors result in a low overall risk",
                plural(total, "identified risk", "identified risks")
            ),
        }
    }

    fn closing(&self, level: Level) -> &'static str {
        match level {
            Level::High => {
                "Additional protective measures must be implemented before the processing starts."
            }
            Level::Medium => "Additional protective measures are recommended.",
            Level::Low => "Standard protective measures are sufficient.",
        }
    }
}

impl Catalog for EnglishCatalog {
    fn level(&self, level: Level) -> &'static str {
        match level {
            Level::Low => "Low",
            Level::Medium => "Medium",
            Level::High => "High",
        }
    }

    fn priority(&self, priority: Priority) -> &'static str {
        match priority {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    fn category(&self, category: RiskCategory) -> &'static str {
        match category {
            RiskCategory::Confidentiality => "Confidentiality",
            RiskCategory::Integrity => "Integrity",
            RiskCategory::Availability => "Availability",
            RiskCategory::Transparency => "Transparency",
            RiskCategory::Lawfulness => "Lawfulness",
        }
    }

    fn issue(&self, issue: ComplianceIssue) -> &'static str {
        match issue {
            ComplianceIssue::SensitiveDataRequiresEncryption => {
                "Sensitive personal data requires encryption"
            }
            ComplianceIssue::HighRiskMissingCriticalMeasures => {
                "High risk with missing critical protective measures"
            }
            ComplianceIssue::HighRiskRequiresAdditionalMeasures => {
                "High risk requires additional protective measures and consultation of the FDPIC"
            }
            ComplianceIssue::LargeScaleRequiresMinimization => {
                "Large-scale processing should apply data minimisation"
            }
            ComplianceIssue::HighRiskTransferRequiresEncryption => {
                "Transfer to a high-risk jurisdiction requires encryption"
            }
        }
    }

    fn safeguard(&self, safeguard: Safeguard) -> &'static str {
        match safeguard {
            Safeguard::Encryption => "encryption",
            Safeguard::AccessControls => "access controls",
            Safeguard::DataMinimization => "data minimisation",
            Safeguard::Pseudonymization => "pseudonymisation",
        }
    }

    fn factor(&self, factor: Factor) -> &'static str {
        match factor {
            Factor::HighSeverityRisks => "High-severity risks",
            Factor::MediumSeverityRisks => "Medium-severity risks",
            Factor::CriticalFactors => "Critical factors",
            Factor::MissingCriticalMeasures => "Missing critical measures",
            Factor::RiskRule => "Risk rule",
            Factor::ExternalClassification => "External classification",
            Factor::SensitiveDataEncryption => "Sensitive data encryption",
            Factor::RiskLevel => "Risk level",
            Factor::LargeScaleMinimization => "Large-scale minimisation",
            Factor::ThirdCountryTransfer => "Third-country transfer",
            Factor::AutomatedDecisionProfiling => "Automated decisions and profiling",
        }
    }

    fn impact(&self, impact: Impact) -> String {
        match impact {
            Impact::RaisesRisk => "raises risk".to_string(),
            Impact::Neutral => "neutral".to_string(),
            Impact::OverallRisk(level) => {
                format!("overall risk {}", self.level(level).to_lowercase())
            }
            Impact::NonCompliant => "non-compliant".to_string(),
            Impact::Compliant => "compliant".to_string(),
            Impact::Note => "note".to_string(),
            Impact::NotAssessed => "not assessed".to_string(),
        }
    }

    fn render(&self, msg: &Msg) -> String {
        match msg {
            Msg::Finding {
                kind,
                high_risk_jurisdiction,
            } => self.finding(*kind, *high_risk_jurisdiction).to_string(),
            Msg::Mitigation { measure } => self.mitigation(*measure).to_string(),
            Msg::RecommendationTitle { topic } => self.recommendation_title(*topic).to_string(),
            Msg::RecommendationBody { topic } => self.recommendation_body(*topic).to_string(),

            Msg::HighSeverityCount { count, findings } => self.with_list(
                format!(
                    "{} identified",
                    plural(*count, "high-severity risk", "high-severity risks")
                ),
                self.texts(findings),
            ),
            Msg::MediumSeverityCount { count, findings } => self.with_list(
                format!(
                    "{} identified",
                    plural(*count, "medium-severity risk", "medium-severity risks")
                ),
                self.texts(findings),
            ),
            Msg::CriticalFactorCount { count, factors } => {
                if *count == 0 {
                    "No critical risk factors present".to_string()
                } else {
                    self.with_list(
                        format!(
                            "{} present",
                            plural(*count, "critical factor", "critical factors")
                        ),
                        join(factors.iter().map(|f| self.critical_factor(*f).to_string())),
                    )
                }
            }
            Msg::MissingCriticalCount { count, missing } => {
                if *count == 0 {
                    "All critical safeguards are in place".to_string()
                } else {
                    self.with_list(
                        format!(
                            "{} missing",
                            plural(*count, "critical safeguard", "critical safeguards")
                        ),
                        join(missing.iter().map(|s| self.safeguard(*s).to_string())),
                    )
                }
            }
            Msg::RiskRuleMatched {
                rule,
                high_count,
                medium_count,
                total,
                critical_factors,
                missing_critical,
                findings,
                ..
            } => self.with_list(
                self.rule(
                    *rule,
                    *high_count,
                    *medium_count,
                    *total,
                    *critical_factors,
                    *missing_critical,
                ),
                self.texts(findings),
            ),
            Msg::ExternalRiskAccepted { level, total } => format!(
                "Overall risk {} taken over from the external classification of {}",
                self.level(*level).to_lowercase(),
                plural(*total, "risk", "risks")
            ),

            Msg::SensitiveDataUnencrypted => {
                "Sensitive personal data is processed without encryption (Art. 22 DSG)".to_string()
            }
            Msg::HighRiskMissingMeasures { missing } => format!(
                "High risk while critical safeguards are missing: {}",
                join(missing.iter().map(|s| self.safeguard(*s).to_string()))
            ),
            Msg::HighRiskNeverCompliant => {
                "A high risk always requires additional measures and prior consultation \
                 of the FDPIC (Art. 23 DSG)"
                    .to_string()
            }
            Msg::MediumRiskSensitiveUnencrypted => {
                "Medium risk with unencrypted sensitive personal data".to_string()
            }
            Msg::MediumRiskCompliant => {
                "Medium risk with the required protective measures in place".to_string()
            }
            Msg::LowRiskMeetsRequirements => {
                "Low risk; the processing meets the basic requirements".to_string()
            }
            Msg::LargeScaleWithoutMinimization => {
                "Large-scale processing without data minimisation (advisory)".to_string()
            }
            Msg::HighRiskTransferUnencrypted => {
                "Transfer to a high-risk jurisdiction without encryption (Art. 16 DSG)".to_string()
            }
            Msg::AutomatedDecisionWithoutProfiling => {
                "Automated decisions without profiling; the verdict is not affected".to_string()
            }
            Msg::VerdictSummary { compliant } => {
                if *compliant {
                    "All compliance checks passed".to_string()
                } else {
                    "At least one compliance check failed".to_string()
                }
            }

            Msg::MissingSafeguardImpact { safeguard } => match safeguard {
                Safeguard::Encryption => {
                    "Data can be read by unauthorised parties if it is intercepted or stolen"
                }
                Safeguard::AccessControls => {
                    "Staff and systems may access more personal data than they need"
                }
                Safeguard::DataMinimization => {
                    "More personal data than necessary is exposed to every other risk"
                }
                Safeguard::Pseudonymization => {
                    "Sensitive data remains directly attributable to individuals"
                }
            }
            .to_string(),
            Msg::MissingSafeguardAdvice { safeguard } => match safeguard {
                Safeguard::Encryption => "Encrypt personal data at rest and in transit",
                Safeguard::AccessControls => {
                    "Introduce role-based access controls and an authorisation concept"
                }
                Safeguard::DataMinimization => {
                    "Limit collection and retention to what the purpose requires"
                }
                Safeguard::Pseudonymization => "Pseudonymise sensitive data wherever possible",
            }
            .to_string(),
            Msg::Driver {
                factor,
                high_risk_jurisdiction,
            } => {
                let mut label = self.critical_factor(*factor).to_string();
                if *high_risk_jurisdiction {
                    label.push_str(" (high-risk jurisdiction)");
                }
                // sentence case
                let mut chars = label.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => label,
                }
            }
            Msg::FindingDriver {
                description,
                severity,
            } => format!(
                "{} ({} severity)",
                self.text(description),
                self.level(*severity).to_lowercase()
            ),
            Msg::RiskExplanation {
                level,
                drivers,
                finding_count,
                high_count,
                missing,
            } => {
                let mut parts = vec![format!(
                    "The overall risk is {}.",
                    self.level(*level).to_lowercase()
                )];
                if !drivers.is_empty() {
                    parts.push(format!(
                        "Main drivers: {}.",
                        drivers
                            .iter()
                            .map(|d| self.render(d))
                            .collect::<Vec<_>>()
                            .join("; ")
                    ));
                }
                parts.push(format!(
                    "{} identified, {} of high severity.",
                    plural(*finding_count, "risk", "risks"),
                    high_count
                ));
                if !missing.is_empty() {
                    parts.push(format!(
                        "Missing measures: {}.",
                        join(missing.iter().map(|s| self.safeguard(*s).to_string()))
                    ));
                }
                parts.push(self.closing(*level).to_string());
                parts.join(" ")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Rendered result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedFinding {
    pub id: String,
    pub category: String,
    pub description: String,
    pub likelihood: String,
    pub impact: String,
    pub severity: String,
    pub mitigation: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedRecommendation {
    pub id: String,
    pub priority: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_basis: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedMeasure {
    pub measure: String,
    pub impact: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedStep {
    pub factor: String,
    pub value: String,
    pub impact: String,
    pub reasoning: String,
}

/// Display-ready mirror of a [`RiskResult`]. Every message code has been
/// resolved through a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedResult {
    pub overall_risk: String,
    pub compliant: bool,
    pub issues: Vec<String>,
    pub risks: Vec<RenderedFinding>,
    pub recommendations: Vec<RenderedRecommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default)]
    pub risk_drivers: Vec<String>,
    #[serde(default)]
    pub missing_measures: Vec<RenderedMeasure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_reasoning: Option<String>,
    #[serde(default)]
    pub risk_steps: Vec<RenderedStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_reasoning: Option<String>,
    #[serde(default)]
    pub compliance_checks: Vec<RenderedStep>,
}

fn render_steps(steps: &[DecisionStep], catalog: &dyn Catalog) -> Vec<RenderedStep> {
    steps
        .iter()
        .map(|s| RenderedStep {
            factor: catalog.factor(s.factor).to_string(),
            value: s.value.clone(),
            impact: catalog.impact(s.impact),
            reasoning: catalog.render(&s.reasoning),
        })
        .collect()
}

pub fn render_result(result: &RiskResult, catalog: &dyn Catalog) -> RenderedResult {
    let risks = result
        .risks
        .iter()
        .map(|r| RenderedFinding {
            id: r.id.clone(),
            category: catalog.category(r.category).to_string(),
            description: catalog.text(&r.description),
            likelihood: catalog.level(r.likelihood).to_string(),
            impact: catalog.level(r.impact).to_string(),
            severity: catalog.level(r.severity()).to_string(),
            mitigation: r.mitigation.iter().map(|m| catalog.text(m)).collect(),
        })
        .collect();

    let recommendations = result
        .recommendations
        .iter()
        .map(|r| RenderedRecommendation {
            id: r.id.clone(),
            priority: catalog.priority(r.priority).to_string(),
            title: catalog.text(&r.title),
            description: catalog.text(&r.description),
            legal_basis: r.legal_basis.clone(),
        })
        .collect();

    let summary = result.risk_summary.as_ref();
    let log = result.decision_log.as_ref();

    RenderedResult {
        overall_risk: catalog.level(result.overall_risk).to_string(),
        compliant: result.compliance_status.compliant,
        issues: result
            .compliance_status
            .issues
            .iter()
            .map(|i| catalog.issue(*i).to_string())
            .collect(),
        risks,
        recommendations,
        explanation: summary.map(|s| catalog.render(&s.risk_explanation)),
        risk_drivers: summary
            .map(|s| s.risk_drivers.iter().map(|d| catalog.render(d)).collect())
            .unwrap_or_default(),
        missing_measures: summary
            .map(|s| {
                s.missing_measures
                    .iter()
                    .map(|m| RenderedMeasure {
                        measure: catalog.safeguard(m.measure).to_string(),
                        impact: catalog.render(&m.impact),
                        recommendation: catalog.render(&m.recommendation),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        risk_reasoning: log.map(|l| catalog.render(&l.risk_calculation.reasoning)),
        risk_steps: log
            .map(|l| render_steps(&l.risk_calculation.steps, catalog))
            .unwrap_or_default(),
        compliance_reasoning: log.map(|l| catalog.render(&l.compliance_decision.reasoning)),
        compliance_checks: log
            .map(|l| render_steps(&l.compliance_decision.checks, catalog))
            .unwrap_or_default(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::engine::assess;
    use crate::assessment::profile::ProcessingProfile;
    use pretty_assertions::assert_eq;

    fn explanation(level: Level) -> String {
        EnglishCatalog.render(&Msg::RiskExplanation {
            level,
            drivers: vec![],
            finding_count: 0,
            high_count: 0,
            missing: vec![],
        })
    }

    #[test]
    fn test_explanation_closing_follows_level() {
        assert!(explanation(Level::High)
            .ends_with("must be implemented before the processing starts."));
        assert!(explanation(Level::Medium).ends_with("are recommended."));
        assert!(explanation(Level::Low).ends_with("are sufficient."));
    }

    #[test]
    fn test_explanation_lists_drivers_and_missing() {
        let text = EnglishCatalog.render(&Msg::RiskExplanation {
            level: Level::High,
            drivers: vec![Msg::Driver {
                factor: CriticalFactor::ThirdCountryTransfer,
                high_risk_jurisdiction: true,
            }],
            finding_count: 2,
            high_count: 1,
            missing: vec![Safeguard::Encryption, Safeguard::AccessControls],
        });
        assert_eq!(
            text,
            "The overall risk is high. \
             Main drivers: Third-country transfer (high-risk jurisdiction). \
             2 risks identified, 1 of high severity. \
             Missing measures: encryption, access controls. \
             Additional protective measures must be implemented before the processing starts."
        );
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(EnglishCatalog.text(&Text::from("Vendor lock-in")), "Vendor lock-in");
    }

    #[test]
    fn test_every_rule_renders() {
        for rule in RiskRule::CASCADE {
            let text = EnglishCatalog.render(&Msg::RiskRuleMatched {
                rule,
                level: rule.outcome(),
                high_count: 1,
                medium_count: 3,
                total: 4,
                critical_factors: 2,
                missing_critical: 1,
                findings: vec![],
            });
            assert!(!text.is_empty());
            assert!(
                text.contains(&format!("{} overall risk", rule.outcome())),
                "rule {:?}: {}",
                rule,
                text
            );
        }
    }

    #[test]
    fn test_counts_use_singular_and_plural() {
        let one = EnglishCatalog.render(&Msg::HighSeverityCount {
            count: 1,
            findings: vec![Text::from("A")],
        });
        assert_eq!(one, "1 high-severity risk identified: A");
        let none = EnglishCatalog.render(&Msg::MediumSeverityCount {
            count: 0,
            findings: vec![],
        });
        assert_eq!(none, "0 medium-severity risks identified");
    }

    #[test]
    fn test_rendered_result_resolves_every_code() {
        let profile = ProcessingProfile {
            sensitive_data: true,
            third_country_transfer: true,
            outsourcing_countries: Some("China".to_string()),
            ..Default::default()
        };
        let result = assess(&profile);
        let rendered = render_result(&result, &EnglishCatalog);

        assert_eq!(rendered.overall_risk, "High");
        assert!(!rendered.compliant);
        assert_eq!(rendered.risks.len(), result.risks.len());
        assert_eq!(rendered.risks[0].description, "Processing of sensitive personal data");
        assert_eq!(
            rendered.risks[1].description,
            "Transfer of personal data to a high-risk third country"
        );
        assert_eq!(rendered.recommendations[0].title, "Special protection for sensitive data");
        assert_eq!(rendered.risk_steps.len(), 5);
        assert!(rendered.explanation.is_some());
        assert!(rendered
            .issues
            .contains(&"Sensitive personal data requires encryption".to_string()));

        let json = serde_json::to_string(&rendered).unwrap();
        assert!(!json.contains("\"code\""));
    }
}
