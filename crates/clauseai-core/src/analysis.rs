//! Analysis verdict types shared between the client, the store, and the CLI.
//!
//! The backend owns these shapes; everything here is consumed read-only.

use serde::{Deserialize, Serialize};

/// Only the first six precedents are ever surfaced.
pub const EVIDENCE_DISPLAY_LIMIT: usize = 6;

/// Structured verdict returned by `POST /api/analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub clause_type: String,
    /// Backend-side label ("Low" | "Medium" | "High"). Banding is always
    /// recomputed from `risk_score`, this is kept for display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,
    /// 0..=10 inclusive.
    pub risk_score: f64,
    /// Rendering order matters; never sort.
    #[serde(default)]
    pub reasons: Vec<String>,
    pub safer_rewrite: String,
    #[serde(default)]
    pub evidence: Vec<EvidenceItem>,
}

impl AnalysisResult {
    /// The evidence rows shown to the user, in backend order.
    pub fn visible_evidence(&self) -> &[EvidenceItem] {
        let end = self.evidence.len().min(EVIDENCE_DISPLAY_LIMIT);
        &self.evidence[..end]
    }
}

/// A retrieved precedent snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    /// CUAD identifier, e.g. `AcmeCorp_2019_Services__Indemnification`.
    #[serde(default)]
    pub cuad_id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clause_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clause_type_display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Two-line card heading derived from a CUAD identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceHeading {
    pub company: String,
    pub clause_type: String,
}

impl EvidenceItem {
    /// Derive the card heading from `cuad_id`.
    ///
    /// `<Company>_<rest>__<Clause Type>`: the company is the first
    /// underscore-separated word with a space before every ASCII capital,
    /// trimmed; the clause type is whatever follows the double underscore.
    pub fn heading(&self) -> EvidenceHeading {
        if self.cuad_id.is_empty() {
            return EvidenceHeading {
                company: "REFERENCE".to_string(),
                clause_type: "Precedent".to_string(),
            };
        }

        let mut parts = self.cuad_id.split("__");
        let head = parts.next().unwrap_or_default();
        let word = if head.is_empty() {
            "UNKNOWN"
        } else {
            head.split('_').next().unwrap_or_default()
        };
        let company = space_capitals(word);
        let clause_type = match parts.next() {
            Some(kind) if !kind.is_empty() => kind.to_string(),
            _ => "General Clause".to_string(),
        };

        EvidenceHeading {
            company,
            clause_type,
        }
    }
}

fn space_capitals(word: &str) -> String {
    let mut out = String::with_capacity(word.len() * 2);
    for ch in word.chars() {
        if ch.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(ch);
    }
    out.trim().to_string()
}
