use crate::types::Level;

/// Severity for a likelihood/impact pair.
///
/// A high input on either axis dominates: high paired with medium or high
/// is high, high paired with low is medium. Both medium is medium, and a
/// low likelihood keeps anything below a high impact at low.
pub fn severity(likelihood: Level, impact: Level) -> Level {
    match (likelihood, impact) {
        (Level::High, Level::High) => Level::High,
        (Level::High, Level::Medium) => Level::High,
        (Level::Medium, Level::High) => Level::High,
        (Level::High, Level::Low) => Level::Medium,
        (Level::Medium, Level::Medium) => Level::Medium,
        (Level::Low, Level::High) => Level::Medium,
        (Level::Medium, Level::Low) => Level::Medium,
        (Level::Low, Level::Medium) => Level::Low,
        (Level::Low, Level::Low) => Level::Low,
    }
}
