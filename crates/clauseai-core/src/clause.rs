use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use crate::analysis::AnalysisResult;

/// Title of the entry a fresh session starts with.
pub const NEW_CLAUSE_TITLE: &str = "New Clause";
/// Title of entries created by the user.
pub const UNTITLED_CLAUSE_TITLE: &str = "Untitled Clause";

/// Opaque, session-unique clause identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClauseId(u64);

impl ClauseId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClauseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClauseId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(Self)
    }
}

/// One document under review.
#[derive(Debug, Clone, PartialEq)]
pub struct ClauseEntry {
    pub id: ClauseId,
    pub title: String,
    pub text: String,
    /// Last successful analysis; only ever replaced by a newer success.
    pub results: Option<AnalysisResult>,
    /// True only while a request for this entry is in flight.
    pub loading: bool,
}

impl ClauseEntry {
    pub fn new(id: ClauseId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            text: String::new(),
            results: None,
            loading: false,
        }
    }

    /// Navigation subtitle: the analyzed clause type, or "Draft".
    pub fn status_label(&self) -> &str {
        self.results
            .as_ref()
            .map(|r| r.clause_type.as_str())
            .unwrap_or("Draft")
    }
}
