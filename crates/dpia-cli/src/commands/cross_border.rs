use clap::Args;
use serde_json::{json, Value};

use dpia_core::assessment::is_high_risk_jurisdiction;

/// Arguments for the high-risk jurisdiction heuristic
#[derive(Args)]
pub struct CrossBorderArgs {
    /// Countries processors operate in, e.g. "India (high risk)"
    #[arg(long)]
    pub countries: Option<String>,

    /// Free-text notes on third-country risk
    #[arg(long)]
    pub notes: Option<String>,
}

pub fn run_cross_border(args: CrossBorderArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if args.countries.is_none() && args.notes.is_none() {
        return Err("--countries or --notes is required".into());
    }

    Ok(json!({
        "countries": args.countries,
        "notes": args.notes,
        "highRiskJurisdiction": is_high_risk_jurisdiction(
            args.countries.as_deref(),
            args.notes.as_deref(),
        ),
    }))
}
