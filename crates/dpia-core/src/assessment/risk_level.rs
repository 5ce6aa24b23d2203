use serde::{Deserialize, Serialize};

use crate::assessment::findings::RiskFinding;
use crate::assessment::profile::{CriticalFactor, ProcessingProfile};
use crate::assessment::trace::{DecisionStep, Factor, Impact, RiskCalculation};
use crate::messages::{Msg, Text};
use crate::types::{Level, Safeguard};

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Counters the cascade rules are evaluated against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskStatistics {
    pub high_count: usize,
    pub medium_count: usize,
    pub total: usize,
    pub critical_factors: Vec<CriticalFactor>,
    pub missing_critical: Vec<Safeguard>,
}

impl RiskStatistics {
    pub fn collect(findings: &[RiskFinding], profile: &ProcessingProfile) -> Self {
        Self {
            high_count: count_severity(findings, Level::High),
            medium_count: count_severity(findings, Level::Medium),
            total: findings.len(),
            critical_factors: profile.critical_factors(),
            missing_critical: profile.missing_critical_safeguards(),
        }
    }

    fn cf(&self) -> usize {
        self.critical_factors.len()
    }

    fn mcm(&self) -> usize {
        self.missing_critical.len()
    }
}

fn count_severity(findings: &[RiskFinding], level: Level) -> usize {
    findings.iter().filter(|f| f.severity() == level).count()
}

fn descriptions_with(findings: &[RiskFinding], level: Option<Level>) -> Vec<Text> {
    findings
        .iter()
        .filter(|f| level.map_or(true, |l| f.severity() == l))
        .map(|f| f.description.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Rule cascade
// ---------------------------------------------------------------------------

/// Aggregate risk rules in priority order. The first matching rule decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskRule {
    /// At least two high-severity findings.
    MultipleHighSeverity,
    /// One high-severity finding with three critical factors or both
    /// critical safeguards missing.
    HighSeverityWithSevereContext,
    /// One high-severity finding with two critical factors or a missing
    /// critical safeguard.
    HighSeverityWithElevatedContext,
    SingleHighSeverity,
    ManyMediumWithCriticalFactors,
    SeveralMedium,
    ManyFindingsWithCriticalFactors,
    Baseline,
}

impl RiskRule {
    pub const CASCADE: [RiskRule; 8] = [
        RiskRule::MultipleHighSeverity,
        RiskRule::HighSeverityWithSevereContext,
        RiskRule::HighSeverityWithElevatedContext,
        RiskRule::SingleHighSeverity,
        RiskRule::ManyMediumWithCriticalFactors,
        RiskRule::SeveralMedium,
        RiskRule::ManyFindingsWithCriticalFactors,
        RiskRule::Baseline,
    ];

    pub fn matches(&self, s: &RiskStatistics) -> bool {
        match self {
            RiskRule::MultipleHighSeverity => s.high_count >= 2,
            RiskRule::HighSeverityWithSevereContext => {
                s.high_count >= 1 && (s.cf() >= 3 || s.mcm() >= 2)
            }
            RiskRule::HighSeverityWithElevatedContext => {
                s.high_count >= 1 && (s.cf() >= 2 || s.mcm() >= 1)
            }
            RiskRule::SingleHighSeverity => s.high_count >= 1,
            RiskRule::ManyMediumWithCriticalFactors => s.medium_count >= 4 && s.cf() >= 2,
            RiskRule::SeveralMedium => s.medium_count >= 3,
            RiskRule::ManyFindingsWithCriticalFactors => s.total >= 3 && s.cf() >= 2,
            RiskRule::Baseline => true,
        }
    }

    pub fn outcome(&self) -> Level {
        match self {
            RiskRule::MultipleHighSeverity
            | RiskRule::HighSeverityWithSevereContext
            | RiskRule::HighSeverityWithElevatedContext
            | RiskRule::ManyMediumWithCriticalFactors => Level::High,
            RiskRule::SingleHighSeverity
            | RiskRule::SeveralMedium
            | RiskRule::ManyFindingsWithCriticalFactors => Level::Medium,
            RiskRule::Baseline => Level::Low,
        }
    }

    /// Severity whose findings a rule is about, `None` for all findings.
    fn subject(&self) -> Option<Option<Level>> {
        match self {
            RiskRule::MultipleHighSeverity
            | RiskRule::HighSeverityWithSevereContext
            | RiskRule::HighSeverityWithElevatedContext
            | RiskRule::SingleHighSeverity => Some(Some(Level::High)),
            RiskRule::ManyMediumWithCriticalFactors | RiskRule::SeveralMedium => {
                Some(Some(Level::Medium))
            }
            RiskRule::ManyFindingsWithCriticalFactors => Some(None),
            RiskRule::Baseline => None,
        }
    }
}

/// First matching rule of the cascade.
pub fn first_match(stats: &RiskStatistics) -> RiskRule {
    RiskRule::CASCADE
        .into_iter()
        .find(|rule| rule.matches(stats))
        .unwrap_or(RiskRule::Baseline)
}

// ---------------------------------------------------------------------------
// Trace
// ---------------------------------------------------------------------------

fn count_impact(count: usize) -> Impact {
    if count > 0 {
        Impact::RaisesRisk
    } else {
        Impact::Neutral
    }
}

/// The four counter steps every risk trace starts with.
pub fn statistic_steps(findings: &[RiskFinding], stats: &RiskStatistics) -> Vec<DecisionStep> {
    vec![
        DecisionStep::new(
            Factor::HighSeverityRisks,
            stats.high_count,
            count_impact(stats.high_count),
            Msg::HighSeverityCount {
                count: stats.high_count,
                findings: descriptions_with(findings, Some(Level::High)),
            },
        ),
        DecisionStep::new(
            Factor::MediumSeverityRisks,
            stats.medium_count,
            count_impact(stats.medium_count),
            Msg::MediumSeverityCount {
                count: stats.medium_count,
                findings: descriptions_with(findings, Some(Level::Medium)),
            },
        ),
        DecisionStep::new(
            Factor::CriticalFactors,
            stats.cf(),
            count_impact(stats.cf()),
            Msg::CriticalFactorCount {
                count: stats.cf(),
                factors: stats.critical_factors.clone(),
            },
        ),
        DecisionStep::new(
            Factor::MissingCriticalMeasures,
            stats.mcm(),
            count_impact(stats.mcm()),
            Msg::MissingCriticalCount {
                count: stats.mcm(),
                missing: stats.missing_critical.clone(),
            },
        ),
    ]
}

/// Classify the overall risk level and record how it was reached.
///
/// Depends only on the findings, the critical-factor flags and the two
/// critical safeguards of the profile.
pub fn classify_risk(
    findings: &[RiskFinding],
    profile: &ProcessingProfile,
) -> (Level, RiskCalculation) {
    let stats = RiskStatistics::collect(findings, profile);
    let rule = first_match(&stats);
    let level = rule.outcome();

    let reasoning = Msg::RiskRuleMatched {
        rule,
        level,
        high_count: stats.high_count,
        medium_count: stats.medium_count,
        total: stats.total,
        critical_factors: stats.cf(),
        missing_critical: stats.mcm(),
        findings: rule
            .subject()
            .map(|severity| descriptions_with(findings, severity))
            .unwrap_or_default(),
    };

    let mut steps = statistic_steps(findings, &stats);
    steps.push(DecisionStep::new(
        Factor::RiskRule,
        level,
        Impact::OverallRisk(level),
        reasoning.clone(),
    ));

    tracing::debug!(
        ?rule,
        %level,
        high = stats.high_count,
        medium = stats.medium_count,
        "risk cascade matched"
    );

    let calculation = RiskCalculation {
        high_severity_risks: stats.high_count,
        medium_severity_risks: stats.medium_count,
        total_risks: stats.total,
        critical_factors: stats.cf(),
        missing_measures: stats.mcm(),
        steps,
        reasoning,
    };
    (level, calculation)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RiskCategory;
    use pretty_assertions::assert_eq;

    fn stats(high: usize, medium: usize, total: usize, cf: usize, mcm: usize) -> RiskStatistics {
        RiskStatistics {
            high_count: high,
            medium_count: medium,
            total,
            critical_factors: CriticalFactor::ALL[..cf].to_vec(),
            missing_critical: [Safeguard::Encryption, Safeguard::AccessControls][..mcm].to_vec(),
        }
    }

    fn finding(id: &str, likelihood: Level, impact: Level) -> RiskFinding {
        RiskFinding::new(
            id,
            RiskCategory::Confidentiality,
            Text::from(id),
            likelihood,
            impact,
            vec![],
        )
    }

    #[test]
    fn test_rule_1_two_high() {
        assert_eq!(first_match(&stats(2, 0, 2, 0, 0)), RiskRule::MultipleHighSeverity);
    }

    #[test]
    fn test_rule_2_severe_context() {
        assert_eq!(
            first_match(&stats(1, 0, 1, 3, 0)),
            RiskRule::HighSeverityWithSevereContext
        );
        assert_eq!(
            first_match(&stats(1, 0, 1, 0, 2)),
            RiskRule::HighSeverityWithSevereContext
        );
    }

    #[test]
    fn test_rule_3_elevated_context() {
        assert_eq!(
            first_match(&stats(1, 0, 1, 2, 0)),
            RiskRule::HighSeverityWithElevatedContext
        );
        assert_eq!(
            first_match(&stats(1, 0, 1, 0, 1)),
            RiskRule::HighSeverityWithElevatedContext
        );
    }

    #[test]
    fn test_rule_4_single_high_is_medium() {
        let rule = first_match(&stats(1, 5, 6, 1, 0));
        assert_eq!(rule, RiskRule::SingleHighSeverity);
        assert_eq!(rule.outcome(), Level::Medium);
    }

    #[test]
    fn test_rule_5_many_medium_with_factors() {
        let rule = first_match(&stats(0, 4, 4, 2, 0));
        assert_eq!(rule, RiskRule::ManyMediumWithCriticalFactors);
        assert_eq!(rule.outcome(), Level::High);
    }

    #[test]
    fn test_rule_6_several_medium() {
        assert_eq!(first_match(&stats(0, 3, 3, 0, 0)), RiskRule::SeveralMedium);
        assert_eq!(first_match(&stats(0, 4, 4, 1, 0)), RiskRule::SeveralMedium);
    }

    #[test]
    fn test_rule_7_many_findings_with_factors() {
        let rule = first_match(&stats(0, 2, 3, 2, 0));
        assert_eq!(rule, RiskRule::ManyFindingsWithCriticalFactors);
        assert_eq!(rule.outcome(), Level::Medium);
    }

    #[test]
    fn test_rule_8_baseline() {
        assert_eq!(first_match(&stats(0, 2, 3, 1, 0)), RiskRule::Baseline);
        assert_eq!(first_match(&stats(0, 0, 0, 5, 2)), RiskRule::Baseline);
    }

    #[test]
    fn test_cascade_first_match_wins() {
        // Satisfies rules 1, 2 and 3; rule 1 must be reported.
        assert_eq!(first_match(&stats(3, 0, 3, 5, 2)), RiskRule::MultipleHighSeverity);
    }

    #[test]
    fn test_trace_records_counters_then_rule() {
        let findings = vec![
            finding("a", Level::High, Level::High),
            finding("b", Level::Medium, Level::Medium),
        ];
        let profile = ProcessingProfile {
            sensitive_data: true,
            large_scale_processing: true,
            encryption: true,
            ..Default::default()
        };
        let (level, calc) = classify_risk(&findings, &profile);

        assert_eq!(level, Level::High);
        assert_eq!(calc.high_severity_risks, 1);
        assert_eq!(calc.medium_severity_risks, 1);
        assert_eq!(calc.total_risks, 2);
        assert_eq!(calc.critical_factors, 2);
        assert_eq!(calc.missing_measures, 1);

        let factors: Vec<Factor> = calc.steps.iter().map(|s| s.factor).collect();
        assert_eq!(
            factors,
            vec![
                Factor::HighSeverityRisks,
                Factor::MediumSeverityRisks,
                Factor::CriticalFactors,
                Factor::MissingCriticalMeasures,
                Factor::RiskRule,
            ]
        );
        assert_eq!(calc.steps[0].value, "1");
        assert_eq!(calc.steps[0].impact, Impact::RaisesRisk);
        assert_eq!(
            calc.steps[0].reasoning,
            Msg::HighSeverityCount {
                count: 1,
                findings: vec![Text::from("a")],
            }
        );
        assert_eq!(calc.steps[2].value, "2");
        assert_eq!(calc.steps[4].value, "high");
        assert_eq!(calc.steps[4].impact, Impact::OverallRisk(Level::High));
        assert_eq!(
            calc.reasoning,
            Msg::RiskRuleMatched {
                rule: RiskRule::HighSeverityWithElevatedContext,
                level: Level::High,
                high_count: 1,
                medium_count: 1,
                total: 2,
                critical_factors: 2,
                missing_critical: 1,
                findings: vec![Text::from("a")],
            }
        );
        assert_eq!(calc.steps[4].reasoning, calc.reasoning);
    }

    #[test]
    fn test_baseline_trace_names_no_findings() {
        let profile = ProcessingProfile {
            encryption: true,
            access_controls: true,
            ..Default::default()
        };
        let (level, calc) = classify_risk(&[], &profile);
        assert_eq!(level, Level::Low);
        assert_eq!(calc.steps.len(), 5);
        assert!(calc.steps[..4].iter().all(|s| s.impact == Impact::Neutral));
        match &calc.reasoning {
            Msg::RiskRuleMatched { rule, findings, .. } => {
                assert_eq!(*rule, RiskRule::Baseline);
                assert!(findings.is_empty());
            }
            other => panic!("unexpected reasoning {:?}", other),
        }
    }
}
