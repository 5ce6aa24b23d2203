use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use clap::Args;
use serde_json::{json, Value};

use dpia_core::external::{
    query_external, ClassificationRequest, ClassificationSource, ExternalOptions,
};
use dpia_core::reconcile::{ExternalOutcome, ResultOrigin};
use dpia_core::render::{render_result, EnglishCatalog};
use dpia_core::{DpiaError, DpiaResult, ProcessingProfile};

use crate::input;

/// Arguments for a processing-profile assessment
#[derive(Args)]
pub struct AssessArgs {
    /// Path to a JSON or YAML profile (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a payload produced by an external classifier; reconciled
    /// against local rules, local rules are used if it is unusable
    #[arg(long)]
    pub external_payload: Option<String>,

    /// Upper bound for reading the external payload, in milliseconds
    #[arg(long, default_value_t = 30_000)]
    pub timeout_ms: u64,

    /// Emit message codes instead of English text
    #[arg(long)]
    pub codes: bool,

    /// Sensitive personal data is processed
    #[arg(long)]
    pub sensitive_data: bool,

    /// Large-scale processing
    #[arg(long)]
    pub large_scale: bool,

    /// Automated individual decisions
    #[arg(long)]
    pub automated_decisions: bool,

    /// Profiling takes place
    #[arg(long)]
    pub profiling: bool,

    /// Data is transferred to third countries
    #[arg(long)]
    pub third_country_transfer: bool,

    /// Data subjects are systematically monitored
    #[arg(long)]
    pub systematic_monitoring: bool,

    /// Data is encrypted at rest and in transit
    #[arg(long)]
    pub encryption: bool,

    /// Access controls are in place
    #[arg(long)]
    pub access_controls: bool,

    /// Data minimisation is applied
    #[arg(long)]
    pub data_minimization: bool,

    /// Data is pseudonymised
    #[arg(long)]
    pub pseudonymization: bool,

    /// Countries processors or sub-processors operate in
    #[arg(long)]
    pub outsourcing_countries: Option<String>,

    /// Free-text notes on third-country risk
    #[arg(long)]
    pub risk_notes: Option<String>,
}

impl AssessArgs {
    fn profile_from_flags(&self) -> ProcessingProfile {
        ProcessingProfile {
            sensitive_data: self.sensitive_data,
            large_scale_processing: self.large_scale,
            automated_decision_making: self.automated_decisions,
            profiling: self.profiling,
            third_country_transfer: self.third_country_transfer,
            systematic_monitoring: self.systematic_monitoring,
            encryption: self.encryption,
            access_controls: self.access_controls,
            data_minimization: self.data_minimization,
            pseudonymization: self.pseudonymization,
            outsourcing_countries: self.outsourcing_countries.clone(),
            third_country_risk_notes: self.risk_notes.clone(),
            ..Default::default()
        }
    }
}

/// Reads a classifier payload that was saved to disk.
struct PayloadFile {
    path: PathBuf,
}

#[async_trait]
impl ClassificationSource for PayloadFile {
    async fn classify(&self, _request: &ClassificationRequest) -> DpiaResult<String> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            DpiaError::ExternalUnavailable(format!("cannot read '{}': {}", self.path.display(), e))
        })
    }

    fn name(&self) -> &str {
        "payload-file"
    }
}

async fn interrupted() {
    // A failed handler registration must not count as an interrupt.
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// A missing or unreadable payload file is an unavailable classification,
/// not a failed command.
fn run_external(
    path: &str,
    profile: &ProcessingProfile,
    timeout_ms: u64,
) -> Result<ExternalOutcome, Box<dyn std::error::Error>> {
    let source = PayloadFile {
        path: PathBuf::from(path),
    };
    let options = ExternalOptions {
        timeout: Duration::from_millis(timeout_ms),
    };
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(query_external(&source, profile, options, interrupted())))
}

pub fn run_assess(args: AssessArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let profile: ProcessingProfile = if let Some(ref path) = args.input {
        tracing::debug!(path = %path, "reading profile from file");
        input::file::read_structured(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        tracing::debug!("reading profile from stdin");
        serde_json::from_value(data).map_err(|e| DpiaError::InvalidInput {
            field: "profile".to_string(),
            reason: e.to_string(),
        })?
    } else {
        tracing::debug!("building profile from flags");
        args.profile_from_flags()
    };

    assess_profile(
        &profile,
        args.external_payload.as_deref(),
        args.timeout_ms,
        args.codes,
    )
}

fn assess_profile(
    profile: &ProcessingProfile,
    external_payload: Option<&str>,
    timeout_ms: u64,
    codes: bool,
) -> Result<Value, Box<dyn std::error::Error>> {
    let outcome = match external_payload {
        Some(path) => run_external(path, profile, timeout_ms)?,
        None => ExternalOutcome::NotAttempted,
    };

    let mut warnings = Vec::new();
    if let ExternalOutcome::Unavailable(ref reason) = outcome {
        warnings.push(format!(
            "External classification unusable ({}); local rules applied",
            reason
        ));
    }

    let (result, origin) = outcome.resolve(profile);
    tracing::debug!(
        origin = ?origin,
        overall_risk = %result.overall_risk,
        fallback = !warnings.is_empty(),
        "assessment resolved"
    );
    let body = if codes {
        serde_json::to_value(&result)?
    } else {
        serde_json::to_value(render_result(&result, &EnglishCatalog))?
    };

    Ok(json!({
        "origin": match origin {
            ResultOrigin::External => "external",
            ResultOrigin::Local => "local",
        },
        "result": body,
        "warnings": warnings,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn profile() -> ProcessingProfile {
        ProcessingProfile {
            sensitive_data: true,
            access_controls: true,
            data_minimization: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_local_only_has_no_warnings() {
        let value = assess_profile(&profile(), None, 1_000, true).unwrap();
        assert_eq!(value["origin"], "local");
        assert_eq!(value["warnings"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_missing_payload_file_falls_back_to_local() {
        let path = std::env::temp_dir().join("dpia-cli-no-such-payload.json");
        let value = assess_profile(&profile(), path.to_str(), 1_000, true).unwrap();

        assert_eq!(value["origin"], "local");
        let warnings = value["warnings"].as_array().unwrap();
        assert_eq!(warnings.len(), 1);
        let warning = warnings[0].as_str().unwrap();
        assert!(warning.starts_with("External classification unusable (cannot read"));
        assert!(!warning.contains("unavailable:"), "{}", warning);
    }

    #[test]
    fn test_payload_file_is_reconciled() {
        let path = std::env::temp_dir().join("dpia-cli-payload-medium.json");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"{{"overallRisk": "medium", "risks": [], "recommendations": []}}"#
        )
        .unwrap();

        let value = assess_profile(&profile(), path.to_str(), 1_000, true).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(value["origin"], "external");
        assert_eq!(value["result"]["overallRisk"], "medium");
        assert_eq!(value["warnings"].as_array().unwrap().len(), 0);
    }
}
