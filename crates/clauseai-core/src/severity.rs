//! Severity banding for risk scores.
//!
//! | score            | band     |
//! |------------------|----------|
//! | `score > 7`      | Critical |
//! | `4 < score <= 7` | Moderate |
//! | `score <= 4`     | Low      |
//!
//! Both boundaries are strict greater-than: `7.0` is Moderate, `7.0001` is
//! Critical, `4.0` is Low.

use std::fmt;

const CRITICAL_ABOVE: f64 = 7.0;
const MODERATE_ABOVE: f64 = 4.0;

/// Highest score on the scale.
pub const MAX_SCORE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Low,
    Moderate,
    Critical,
}

impl Severity {
    pub fn from_score(score: f64) -> Self {
        if score > CRITICAL_ABOVE {
            Severity::Critical
        } else if score > MODERATE_ABOVE {
            Severity::Moderate
        } else {
            Severity::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Moderate => "Moderate",
            Severity::Critical => "Critical",
        }
    }

    /// Badge text shown next to the report header.
    pub fn badge(self) -> &'static str {
        match self {
            Severity::Low => "Low Risk",
            Severity::Moderate => "Moderate Risk",
            Severity::Critical => "Critical Risk",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Text rendering of the circular score gauge: one cell per point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gauge {
    score: f64,
}

impl Gauge {
    pub const CELLS: usize = 10;

    pub fn new(score: f64) -> Self {
        Self { score }
    }

    /// Filled cells, proportional to `score / 10` and clamped to the scale.
    pub fn filled(&self) -> usize {
        if !self.score.is_finite() {
            return 0;
        }
        let fraction = (self.score / MAX_SCORE).clamp(0.0, 1.0);
        (fraction * Self::CELLS as f64).round() as usize
    }
}

impl fmt::Display for Gauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filled = self.filled();
        write!(
            f,
            "[{}{}] {}/10",
            "#".repeat(filled),
            "-".repeat(Self::CELLS - filled),
            self.score
        )
    }
}
