//! Clause store: the single source of truth for the clause collection, the
//! active selection, and each entry's analysis lifecycle.

mod driver;
mod error;
mod store;

pub use driver::{complete_analysis, run_analysis};
pub use error::StoreError;
pub use store::{AnalysisOutcome, AnalysisRequest, ClauseStore};
