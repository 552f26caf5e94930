//! Async glue between the store and an [`Analyzer`].
//!
//! The store lock is never held across the network call, so other entries
//! stay editable while a request is pending.

use clauseai_client::Analyzer;
use tokio::sync::Mutex;

use crate::{AnalysisOutcome, AnalysisRequest, ClauseStore};

/// Analyze the active entry: begin, call the analyzer, apply by captured id.
///
/// `None` when the store declined to start (empty text or already pending).
pub async fn run_analysis<A: Analyzer + ?Sized>(
    store: &Mutex<ClauseStore>,
    analyzer: &A,
) -> Option<AnalysisOutcome> {
    let request = store.lock().await.begin_analysis()?;
    Some(complete_analysis(store, analyzer, request).await)
}

/// Finish a request obtained from [`ClauseStore::begin_analysis`].
pub async fn complete_analysis<A: Analyzer + ?Sized>(
    store: &Mutex<ClauseStore>,
    analyzer: &A,
    request: AnalysisRequest,
) -> AnalysisOutcome {
    let outcome = analyzer.analyze(&request.text).await;
    store.lock().await.finish_analysis(request.id, outcome)
}
