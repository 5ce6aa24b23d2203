use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DpiaError;

/// Three-step scale shared by likelihood, impact, severity and the overall
/// risk rating. Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    #[default]
    Medium,
    High,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = DpiaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Level::Low),
            "medium" => Ok(Level::Medium),
            "high" => Ok(Level::High),
            other => Err(DpiaError::InvalidInput {
                field: "level".to_string(),
                reason: format!("'{}' is not one of low, medium, high", other),
            }),
        }
    }
}

/// Recommendation priority. Ordered `Low < Medium < High` so that a
/// descending sort puts high-priority items first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl FromStr for Priority {
    type Err = DpiaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(DpiaError::InvalidInput {
                field: "priority".to_string(),
                reason: format!("'{}' is not one of low, medium, high", other),
            }),
        }
    }
}

/// Protection goal a finding threatens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    #[default]
    Confidentiality,
    Integrity,
    Availability,
    Transparency,
    Lawfulness,
}

impl FromStr for RiskCategory {
    type Err = DpiaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "confidentiality" => Ok(RiskCategory::Confidentiality),
            "integrity" => Ok(RiskCategory::Integrity),
            "availability" => Ok(RiskCategory::Availability),
            "transparency" => Ok(RiskCategory::Transparency),
            "lawfulness" => Ok(RiskCategory::Lawfulness),
            other => Err(DpiaError::InvalidInput {
                field: "category".to_string(),
                reason: format!("unknown risk category '{}'", other),
            }),
        }
    }
}

/// Declared volume of personal data processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataVolume {
    #[default]
    Low,
    Medium,
    High,
}

/// Technical and organisational measures tracked by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Safeguard {
    Encryption,
    AccessControls,
    DataMinimization,
    Pseudonymization,
}

impl Safeguard {
    pub const ALL: [Safeguard; 4] = [
        Safeguard::Encryption,
        Safeguard::AccessControls,
        Safeguard::DataMinimization,
        Safeguard::Pseudonymization,
    ];

    /// Encryption and access controls weigh extra in the aggregate cascade.
    pub fn is_critical(&self) -> bool {
        matches!(self, Safeguard::Encryption | Safeguard::AccessControls)
    }
}
