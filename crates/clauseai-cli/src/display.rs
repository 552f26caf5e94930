//! Text rendering for the workbench: the clause navigation list and the
//! analysis report card.
//!
//! Everything renders into a `String` so the session loop decides where it
//! goes.

use std::fmt::Write;

use clauseai_core::{ClauseEntry, EVIDENCE_DISPLAY_LIMIT, Gauge, Severity};
use clauseai_store::ClauseStore;

const TITLE_WIDTH: usize = 28;
const EVIDENCE_EXCERPT_CHARS: usize = 280;

// ── Navigation list ──

/// One line per entry, active entry marked with `>`.
pub fn render_clause_list(store: &ClauseStore) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Clauses ({})", store.clauses().len());
    for entry in store.clauses() {
        let marker = if entry.id == store.active_id() { '>' } else { ' ' };
        let _ = write!(
            out,
            "{marker} #{:<4} {:<width$} {}",
            entry.id.get(),
            truncate(&entry.title, TITLE_WIDTH),
            entry.status_label(),
            width = TITLE_WIDTH,
        );
        if entry.loading {
            out.push_str("  [analyzing...]");
        }
        out.push('\n');
    }
    out
}

// ── Report card ──

/// Full report for one entry, or the idle placeholder when it has no results.
pub fn render_report(entry: &ClauseEntry, show_rewrite: bool) -> String {
    let mut out = String::new();
    let Some(results) = entry.results.as_ref() else {
        let _ = writeln!(out, "#{} {}", entry.id, entry.title);
        if entry.loading {
            out.push_str("Analyzing...\n");
        } else {
            out.push_str("Ready for analysis. Use `analyze` once the clause text is loaded.\n");
        }
        return out;
    };

    let severity = Severity::from_score(results.risk_score);
    let _ = writeln!(out, "=== {} ===", results.clause_type);
    let _ = write!(out, "Analysis Report  [{}]", severity.badge());
    if let Some(level) = &results.risk_level {
        let _ = write!(out, "  (backend level: {level})");
    }
    out.push_str("\n\n");

    out.push_str("Risk\n");
    let _ = writeln!(out, "  {:<26} {}", "score", Gauge::new(results.risk_score));
    let _ = writeln!(out, "  {:<26} {}", "severity", severity);
    out.push('\n');

    if !results.reasons.is_empty() {
        let _ = writeln!(out, "Findings ({})", results.reasons.len());
        for reason in &results.reasons {
            let _ = writeln!(out, "  - {reason}");
        }
        out.push('\n');
    }

    if show_rewrite {
        out.push_str("Suggested Rewrite\n");
        let _ = writeln!(out, "  \"{}\"", results.safer_rewrite);
        out.push_str("  (`apply` to replace the clause text, `dismiss` to hide)\n\n");
    }

    let shown = results.visible_evidence();
    if !shown.is_empty() {
        let _ = writeln!(
            out,
            "Precedents (top {} of {})",
            shown.len(),
            results.evidence.len()
        );
        for item in shown {
            let heading = item.heading();
            let _ = writeln!(out, "  {} / {}", heading.company, heading.clause_type);
            let _ = writeln!(
                out,
                "    \"{}\"",
                truncate(&item.text, EVIDENCE_EXCERPT_CHARS)
            );
        }
        if results.evidence.len() > EVIDENCE_DISPLAY_LIMIT {
            let _ = writeln!(
                out,
                "  ... and {} more not shown",
                results.evidence.len() - EVIDENCE_DISPLAY_LIMIT
            );
        }
    }

    out
}

// ── Helpers ──

/// Char-boundary-safe truncation with a trailing ellipsis.
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}
