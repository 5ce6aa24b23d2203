pub mod assessment;
pub mod cross_border;
pub mod severity;
