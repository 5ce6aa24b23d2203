pub mod compliance;
pub mod cross_border;
pub mod engine;
pub mod findings;
pub mod profile;
pub mod risk_level;
pub mod severity;
pub mod summary;
pub mod trace;

pub use compliance::{decide_compliance, ComplianceIssue, ComplianceStatus};
pub use cross_border::is_high_risk_jurisdiction;
pub use engine::{assess, transfer_risk, RiskResult};
pub use findings::{generate_findings, FindingKind, FindingSet, Recommendation, RiskFinding};
pub use profile::{CriticalFactor, ProcessingProfile};
pub use risk_level::{classify_risk, RiskRule, RiskStatistics};
pub use severity::severity;
pub use summary::{build_summary, MissingMeasure, RiskSummary};
pub use trace::{ComplianceDecision, DecisionLog, DecisionStep, Factor, Impact, RiskCalculation};
