pub mod analysis;
pub mod clause;
pub mod severity;

pub use analysis::{AnalysisResult, EVIDENCE_DISPLAY_LIMIT, EvidenceHeading, EvidenceItem};
pub use clause::{ClauseEntry, ClauseId, NEW_CLAUSE_TITLE, UNTITLED_CLAUSE_TITLE};
pub use severity::{Gauge, Severity};
