//! Analysis client: one POST per clause to the remote analysis service.

mod analyzer;
mod config;
pub mod http;

pub use analyzer::Analyzer;
pub use config::{ANALYZE_PATH, ClientConfig, DEFAULT_BASE_URL, HEALTH_PATH};
pub use http::{AnalysisClient, AnalyzeError, HealthStatus};
