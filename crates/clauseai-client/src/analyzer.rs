use async_trait::async_trait;
use clauseai_core::AnalysisResult;

use crate::AnalyzeError;

/// Anything that turns clause text into a verdict.
///
/// [`AnalysisClient`](crate::AnalysisClient) is the production
/// implementation; the store only depends on this trait.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, clause_text: &str) -> Result<AnalysisResult, AnalyzeError>;
}
