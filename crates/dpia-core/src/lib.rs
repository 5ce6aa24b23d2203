pub mod assessment;
pub mod error;
pub mod messages;
pub mod reconcile;
pub mod render;
pub mod types;

#[cfg(feature = "external")]
pub mod external;

pub use assessment::{assess, ProcessingProfile, RiskResult};
pub use error::DpiaError;
pub use types::*;

/// Standard result type for fallible dpia operations
pub type DpiaResult<T> = Result<T, DpiaError>;
