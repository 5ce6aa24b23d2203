use serde::{Deserialize, Serialize};

use crate::types::{DataVolume, Safeguard};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Risk-factor flags that count towards `criticalFactors` in the aggregate
/// cascade. Declaration order is the order risk drivers are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriticalFactor {
    SensitiveData,
    ThirdCountryTransfer,
    AutomatedDecisionMaking,
    LargeScaleProcessing,
    SystematicMonitoring,
}

impl CriticalFactor {
    pub const ALL: [CriticalFactor; 5] = [
        CriticalFactor::SensitiveData,
        CriticalFactor::ThirdCountryTransfer,
        CriticalFactor::AutomatedDecisionMaking,
        CriticalFactor::LargeScaleProcessing,
        CriticalFactor::SystematicMonitoring,
    ];
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Description of a data-processing activity, as collected by the
/// assessment form. Booleans default to `false`; free text stays `None`
/// when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessingProfile {
    // Basic information
    pub project_name: String,
    pub project_description: String,
    pub responsible_person: String,
    pub contact_email: String,

    // Processing details
    pub data_categories: Vec<String>,
    pub data_subjects: Vec<String>,
    pub data_volume: DataVolume,
    pub data_retention: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outsourcing_countries: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub third_country_risk_notes: Option<String>,

    // Processing characteristics
    pub processing_purpose: String,
    pub legal_basis: String,
    pub data_sharing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_sharing_details: Option<String>,
    pub third_country_transfer: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub third_country_details: Option<String>,

    // Technical and organisational measures
    pub encryption: bool,
    pub access_controls: bool,
    pub data_minimization: bool,
    pub pseudonymization: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_measures: Option<String>,

    // Risk factors
    pub sensitive_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensitive_data_details: Option<String>,
    pub automated_decision_making: bool,
    pub profiling: bool,
    pub large_scale_processing: bool,
    pub systematic_monitoring: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_assessments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stakeholder_consultation: Option<String>,
}

impl ProcessingProfile {
    pub fn has_factor(&self, factor: CriticalFactor) -> bool {
        match factor {
            CriticalFactor::SensitiveData => self.sensitive_data,
            CriticalFactor::ThirdCountryTransfer => self.third_country_transfer,
            CriticalFactor::AutomatedDecisionMaking => self.automated_decision_making,
            CriticalFactor::LargeScaleProcessing => self.large_scale_processing,
            CriticalFactor::SystematicMonitoring => self.systematic_monitoring,
        }
    }

    pub fn has_safeguard(&self, safeguard: Safeguard) -> bool {
        match safeguard {
            Safeguard::Encryption => self.encryption,
            Safeguard::AccessControls => self.access_controls,
            Safeguard::DataMinimization => self.data_minimization,
            Safeguard::Pseudonymization => self.pseudonymization,
        }
    }

    /// Active critical factors, in reporting order.
    pub fn critical_factors(&self) -> Vec<CriticalFactor> {
        CriticalFactor::ALL
            .into_iter()
            .filter(|f| self.has_factor(*f))
            .collect()
    }

    /// Critical safeguards the profile lacks.
    pub fn missing_critical_safeguards(&self) -> Vec<Safeguard> {
        Safeguard::ALL
            .into_iter()
            .filter(|s| s.is_critical() && !self.has_safeguard(*s))
            .collect()
    }
}
