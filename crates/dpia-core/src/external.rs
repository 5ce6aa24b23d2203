//! Bounded, cancellable calls to an external classification service.
//!
//! The service sees a redacted view of the profile and answers with a
//! RiskResult-shaped JSON payload. Whatever it returns goes through
//! [`crate::reconcile`]; every failure mode ends up as
//! [`ExternalOutcome::Unavailable`] and the caller falls back to local rules.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::assessment::engine::RiskResult;
use crate::assessment::profile::ProcessingProfile;
use crate::reconcile::{reconcile_payload, ExternalOutcome, ResultOrigin};
use crate::types::DataVolume;
use crate::DpiaResult;

/// Default upper bound for one external call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// What the external service is allowed to see. Names, contact details and
/// free-text notes stay local; only their presence is disclosed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationRequest {
    pub processing_purpose: String,
    pub data_volume: DataVolume,
    pub data_sharing: bool,
    pub third_country_transfer: bool,
    pub has_transfer_details: bool,
    pub encryption: bool,
    pub access_controls: bool,
    pub data_minimization: bool,
    pub pseudonymization: bool,
    pub sensitive_data: bool,
    pub has_sensitive_data_details: bool,
    pub automated_decision_making: bool,
    pub profiling: bool,
    pub large_scale_processing: bool,
    pub systematic_monitoring: bool,
}

fn present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.trim().is_empty())
}

impl From<&ProcessingProfile> for ClassificationRequest {
    fn from(p: &ProcessingProfile) -> Self {
        Self {
            processing_purpose: p.processing_purpose.clone(),
            data_volume: p.data_volume,
            data_sharing: p.data_sharing,
            third_country_transfer: p.third_country_transfer,
            has_transfer_details: present(&p.third_country_details)
                || present(&p.outsourcing_countries)
                || present(&p.third_country_risk_notes),
            encryption: p.encryption,
            access_controls: p.access_controls,
            data_minimization: p.data_minimization,
            pseudonymization: p.pseudonymization,
            sensitive_data: p.sensitive_data,
            has_sensitive_data_details: present(&p.sensitive_data_details),
            automated_decision_making: p.automated_decision_making,
            profiling: p.profiling,
            large_scale_processing: p.large_scale_processing,
            systematic_monitoring: p.systematic_monitoring,
        }
    }
}

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// An external classifier, typically a hosted language model.
#[async_trait]
pub trait ClassificationSource: Send + Sync {
    /// Return the raw payload text. Errors are reported as
    /// [`crate::DpiaError::ExternalUnavailable`].
    async fn classify(&self, request: &ClassificationRequest) -> DpiaResult<String>;

    fn name(&self) -> &str {
        "external"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalOptions {
    pub timeout: Duration,
}

impl Default for ExternalOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Query the source once, bounded by `options.timeout` and abandoned as soon
/// as `cancel` resolves.
pub async fn query_external<C>(
    source: &dyn ClassificationSource,
    profile: &ProcessingProfile,
    options: ExternalOptions,
    cancel: C,
) -> ExternalOutcome
where
    C: Future<Output = ()> + Send,
{
    let request = ClassificationRequest::from(profile);
    let call = tokio::time::timeout(options.timeout, source.classify(&request));

    let payload = tokio::select! {
        biased;
        _ = cancel => {
            tracing::info!(source = source.name(), "external classification cancelled");
            return ExternalOutcome::Unavailable("cancelled".to_string());
        }
        result = call => match result {
            Ok(Ok(payload)) => payload,
            Ok(Err(e)) => {
                tracing::warn!(
                    source = source.name(),
                    error = %e,
                    "external classification failed"
                );
                return e.into();
            }
            Err(_) => {
                tracing::warn!(
                    source = source.name(),
                    timeout_ms = options.timeout.as_millis() as u64,
                    "external classification timed out"
                );
                return ExternalOutcome::Unavailable(format!(
                    "timed out after {}ms",
                    options.timeout.as_millis()
                ));
            }
        },
    };

    reconcile_payload(&payload, profile)
}

/// External classification with local fallback. Always yields a complete
/// result and reports which pipeline produced it.
pub async fn assess_with_fallback<C>(
    source: &dyn ClassificationSource,
    profile: &ProcessingProfile,
    options: ExternalOptions,
    cancel: C,
) -> (RiskResult, ResultOrigin)
where
    C: Future<Output = ()> + Send,
{
    query_external(source, profile, options, cancel)
        .await
        .resolve(profile)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
