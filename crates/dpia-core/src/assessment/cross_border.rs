//! Best-effort text classification of third-country transfer notes.
//!
//! Looks for keywords in the free-text outsourcing-country and risk-note
//! fields. The result drives the likelihood of the transfer finding and the
//! Art. 16 DSG compliance check; it is not a legal adequacy determination.

/// Keywords indicating adequate protection (EU/EEA, UK, Switzerland or an
/// explicit low-risk note). Any hit overrides high-risk keywords.
const ADEQUATE_KEYWORDS: &[&str] = &[
    "eu",
    "eea",
    "ewr",
    "uk",
    "ch",
    "low",
    "niedrig",
    "adequate",
    "adequacy",
    "angemessen",
    "schweiz",
    "switzerland",
];

/// Keywords indicating a high-risk jurisdiction.
const HIGH_RISK_KEYWORDS: &[&str] = &[
    "high",
    "hoch",
    "risk",
    "risiko",
    "hochrisiko",
    "china",
    "russia",
    "russland",
    "iran",
    "north korea",
    "nordkorea",
    "india",
    "indien",
    "brazil",
    "brasilien",
];

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Single words match a whole token; phrases match a run of tokens.
fn contains_keyword(tokens: &[String], keyword: &str) -> bool {
    let parts: Vec<&str> = keyword.split(' ').collect();
    if parts.len() == 1 {
        return tokens.iter().any(|t| t == keyword);
    }
    tokens
        .windows(parts.len())
        .any(|w| w.iter().zip(&parts).all(|(t, p)| t == p))
}

/// Whether the transfer notes point at a high-risk jurisdiction.
///
/// Empty or absent notes assume adequate protection.
pub fn is_high_risk_jurisdiction(
    outsourcing_countries: Option<&str>,
    third_country_risk_notes: Option<&str>,
) -> bool {
    let combined = format!(
        "{} {}",
        outsourcing_countries.unwrap_or_default(),
        third_country_risk_notes.unwrap_or_default()
    )
    .to_lowercase();

    if combined.trim().is_empty() {
        return false;
    }

    let tokens = tokenize(&combined);

    if ADEQUATE_KEYWORDS
        .iter()
        .any(|k| contains_keyword(&tokens, k))
    {
        return false;
    }

    let high_risk = HIGH_RISK_KEYWORDS
        .iter()
        .any(|k| contains_keyword(&tokens, k));

    if high_risk {
        tracing::debug!("cross-border notes classified as high-risk jurisdiction");
    }
    high_risk
}
