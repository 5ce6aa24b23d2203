use clap::Args;
use serde_json::{json, Value};

use dpia_core::assessment::severity;
use dpia_core::Level;

/// Arguments for a severity matrix lookup
#[derive(Args)]
pub struct SeverityArgs {
    /// Likelihood: low, medium or high
    #[arg(long)]
    pub likelihood: String,

    /// Impact: low, medium or high
    #[arg(long)]
    pub impact: String,
}

pub fn run_severity(args: SeverityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let likelihood: Level = args.likelihood.parse()?;
    let impact: Level = args.impact.parse()?;

    Ok(json!({
        "likelihood": likelihood,
        "impact": impact,
        "severity": severity(likelihood, impact),
    }))
}
