//! Reconciliation of externally sourced classifications.
//!
//! An external reasoning service may propose a risk level, findings and
//! recommendations. Only the level and the normalized findings are taken
//! over; the compliance verdict, the risk summary and the decision log are
//! always recomputed with the local rules so that every result carries the
//! same audit guarantees regardless of where it came from.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::assessment::compliance::decide_compliance;
use crate::assessment::engine::{assess, transfer_risk, RiskResult};
use crate::assessment::findings::{sort_recommendations, Recommendation, RiskFinding};
use crate::assessment::profile::ProcessingProfile;
use crate::assessment::risk_level::{statistic_steps, RiskStatistics};
use crate::assessment::summary::build_summary;
use crate::assessment::trace::{DecisionLog, DecisionStep, Factor, Impact, RiskCalculation};
use crate::error::DpiaError;
use crate::messages::{Msg, Text};
use crate::types::{Level, Priority, RiskCategory};
use crate::DpiaResult;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Which pipeline produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultOrigin {
    External,
    Local,
}

/// State of the external path for one submission.
///
/// Callers resolve it with [`ExternalOutcome::resolve`], which always
/// yields a complete result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalOutcome {
    External(Box<RiskResult>),
    Unavailable(String),
    NotAttempted,
}

impl ExternalOutcome {
    pub fn origin(&self) -> Option<ResultOrigin> {
        match self {
            ExternalOutcome::External(_) => Some(ResultOrigin::External),
            _ => None,
        }
    }

    /// Take the reconciled result, or run the local pipeline instead.
    pub fn resolve(self, profile: &ProcessingProfile) -> (RiskResult, ResultOrigin) {
        match self {
            ExternalOutcome::External(result) => (*result, ResultOrigin::External),
            ExternalOutcome::Unavailable(reason) => {
                tracing::warn!(%reason, "external classification unavailable, using local rules");
                (assess(profile), ResultOrigin::Local)
            }
            ExternalOutcome::NotAttempted => (assess(profile), ResultOrigin::Local),
        }
    }
}

impl From<DpiaError> for ExternalOutcome {
    /// Keeps the bare reason so callers can word their own warning.
    fn from(error: DpiaError) -> Self {
        match error {
            DpiaError::ExternalUnavailable(reason) => ExternalOutcome::Unavailable(reason),
            other => ExternalOutcome::Unavailable(other.to_string()),
        }
    }
}

/// Reconcile a raw payload, folding any failure into `Unavailable`.
pub fn reconcile_payload(payload: &str, profile: &ProcessingProfile) -> ExternalOutcome {
    match reconcile(payload, profile) {
        Ok(result) => ExternalOutcome::External(Box::new(result)),
        Err(e) => e.into(),
    }
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

fn unavailable(reason: impl Into<String>) -> DpiaError {
    DpiaError::ExternalUnavailable(reason.into())
}

/// The first complete JSON object in the payload. Language models like to
/// wrap JSON in prose or code fences, and the prose may contain braces of
/// its own.
fn extract_object(payload: &str) -> DpiaResult<Value> {
    let mut first_error = None;
    for (start, _) in payload.match_indices('{') {
        let mut stream = serde_json::Deserializer::from_str(&payload[start..]).into_iter::<Value>();
        match stream.next() {
            Some(Ok(value)) => return Ok(value),
            Some(Err(e)) => {
                first_error.get_or_insert(e);
            }
            None => {}
        }
    }
    Err(match first_error {
        Some(e) => unavailable(format!("malformed JSON: {}", e)),
        None => unavailable("no JSON object in payload"),
    })
}

fn non_empty_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn parse_or_default<T: std::str::FromStr + Default>(obj: &Map<String, Value>, key: &str) -> T {
    obj.get(key)
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}

fn required_array<'a>(obj: &'a Map<String, Value>, key: &str) -> DpiaResult<&'a Vec<Value>> {
    obj.get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| unavailable(format!("missing array field '{}'", key)))
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

fn normalize_risk(index: usize, value: &Value) -> DpiaResult<RiskFinding> {
    let obj = value
        .as_object()
        .ok_or_else(|| unavailable(format!("risk {} is not an object", index + 1)))?;

    let id = non_empty_str(obj, "id")
        .map(str::to_string)
        .unwrap_or_else(|| format!("ai-risk-{}", index + 1));
    let description = non_empty_str(obj, "description")
        .ok_or_else(|| unavailable(format!("risk {} has no description", index + 1)))?;
    let category: RiskCategory = parse_or_default(obj, "category");
    let likelihood: Level = parse_or_default(obj, "likelihood");
    let impact: Level = parse_or_default(obj, "impact");
    let mitigation = obj
        .get("mitigation")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(Text::from)
                .collect()
        })
        .unwrap_or_default();

    // Any severity in the payload is ignored; it follows from the matrix.
    Ok(RiskFinding::new(
        id,
        category,
        Text::from(description),
        likelihood,
        impact,
        mitigation,
    ))
}

fn normalize_recommendation(index: usize, value: &Value) -> DpiaResult<Recommendation> {
    let obj = value
        .as_object()
        .ok_or_else(|| unavailable(format!("recommendation {} is not an object", index + 1)))?;

    let title = non_empty_str(obj, "title")
        .ok_or_else(|| unavailable(format!("recommendation {} has no title", index + 1)))?;

    Ok(Recommendation {
        id: non_empty_str(obj, "id")
            .map(str::to_string)
            .unwrap_or_else(|| format!("ai-rec-{}", index + 1)),
        priority: parse_or_default::<Priority>(obj, "priority"),
        title: Text::from(title),
        description: Text::from(non_empty_str(obj, "description").unwrap_or_default()),
        legal_basis: non_empty_str(obj, "legalBasis")
            .or_else(|| non_empty_str(obj, "legal_basis"))
            .map(str::to_string),
    })
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// Normalize an external classification payload and rebuild everything the
/// audit trail depends on with local rules.
///
/// The payload's `overallRisk` is trusted. Its `complianceStatus` is
/// discarded: the verdict is recomputed from the local profile flags, so a
/// high level is never compliant here either.
pub fn reconcile(payload: &str, profile: &ProcessingProfile) -> DpiaResult<RiskResult> {
    let value = extract_object(payload)?;
    let obj = value
        .as_object()
        .ok_or_else(|| unavailable("payload is not an object"))?;

    let overall_risk: Level = obj
        .get("overallRisk")
        .and_then(Value::as_str)
        .ok_or_else(|| unavailable("missing field 'overallRisk'"))?
        .parse()
        .map_err(|e: DpiaError| unavailable(e.to_string()))?;

    let risks = required_array(obj, "risks")?
        .iter()
        .enumerate()
        .map(|(i, v)| normalize_risk(i, v))
        .collect::<DpiaResult<Vec<_>>>()?;

    let mut recommendations = required_array(obj, "recommendations")?
        .iter()
        .enumerate()
        .map(|(i, v)| normalize_recommendation(i, v))
        .collect::<DpiaResult<Vec<_>>>()?;
    sort_recommendations(&mut recommendations);

    let high_risk_jurisdiction = transfer_risk(profile);

    let stats = RiskStatistics::collect(&risks, profile);
    let reasoning = Msg::ExternalRiskAccepted {
        level: overall_risk,
        total: risks.len(),
    };
    let mut steps = statistic_steps(&risks, &stats);
    steps.push(DecisionStep::new(
        Factor::ExternalClassification,
        overall_risk,
        Impact::OverallRisk(overall_risk),
        reasoning.clone(),
    ));
    let risk_calculation = RiskCalculation {
        high_severity_risks: stats.high_count,
        medium_severity_risks: stats.medium_count,
        total_risks: stats.total,
        critical_factors: stats.critical_factors.len(),
        missing_measures: stats.missing_critical.len(),
        steps,
        reasoning,
    };

    let (compliance_status, compliance_decision) =
        decide_compliance(overall_risk, profile, high_risk_jurisdiction);
    let risk_summary = build_summary(profile, &risks, overall_risk, high_risk_jurisdiction);

    tracing::debug!(
        overall_risk = %overall_risk,
        risks = risks.len(),
        recommendations = recommendations.len(),
        "external classification reconciled"
    );

    Ok(RiskResult {
        overall_risk,
        risks,
        recommendations,
        compliance_status,
        risk_summary: Some(risk_summary),
        decision_log: Some(DecisionLog {
            risk_calculation,
            compliance_decision,
        }),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
