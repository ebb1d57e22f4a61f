pub mod health_status;
pub mod inference;
pub mod prediction;
pub mod storage;

pub use health_status::OverallStatus;
pub use prediction::{ClassConfidence, ImagePrediction, StatusSummary};
