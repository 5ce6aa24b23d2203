use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Serialize;

use dpia_core::assessment::severity;
use dpia_core::reconcile::{reconcile_payload, ResultOrigin};
use dpia_core::render::{render_result, EnglishCatalog};
use dpia_core::{assess, Level, ProcessingProfile, RiskResult};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_profile(profile_json: &str) -> NapiResult<ProcessingProfile> {
    serde_json::from_str(profile_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

/// Local assessment. Returns the RiskResult with message codes.
#[napi]
pub fn assess_processing(profile_json: String) -> NapiResult<String> {
    let profile = parse_profile(&profile_json)?;
    serde_json::to_string(&assess(&profile)).map_err(to_napi_error)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Reconciled {
    origin: ResultOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback_reason: Option<String>,
    result: RiskResult,
}

/// Reconcile a payload the host obtained from an external classifier.
/// Falls back to the local pipeline when the payload is unusable; the
/// returned `origin` says which one produced the result.
#[napi]
pub fn reconcile_external(profile_json: String, payload: String) -> NapiResult<String> {
    let profile = parse_profile(&profile_json)?;
    let outcome = reconcile_payload(&payload, &profile);
    let fallback_reason = match &outcome {
        dpia_core::reconcile::ExternalOutcome::Unavailable(reason) => Some(reason.clone()),
        _ => None,
    };
    let (result, origin) = outcome.resolve(&profile);
    serde_json::to_string(&Reconciled {
        origin,
        fallback_reason,
        result,
    })
    .map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

/// Resolve every message code in a RiskResult to English text.
#[napi]
pub fn render_english(result_json: String) -> NapiResult<String> {
    let result: RiskResult = serde_json::from_str(&result_json).map_err(to_napi_error)?;
    serde_json::to_string(&render_result(&result, &EnglishCatalog)).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Building blocks
// ---------------------------------------------------------------------------

#[napi]
pub fn severity_of(likelihood: String, impact: String) -> NapiResult<String> {
    let likelihood: Level = likelihood.parse().map_err(to_napi_error)?;
    let impact: Level = impact.parse().map_err(to_napi_error)?;
    Ok(severity(likelihood, impact).to_string())
}

#[napi]
pub fn high_risk_jurisdiction(countries: Option<String>, notes: Option<String>) -> bool {
    dpia_core::assessment::is_high_risk_jurisdiction(countries.as_deref(), notes.as_deref())
}
