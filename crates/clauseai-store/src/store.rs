//! The clause collection and its active selection.
//!
//! Invariants held by every operation:
//! - the collection is never empty;
//! - `active` always names an entry in the collection;
//! - `loading` and `results` are per entry, and an analysis result is only
//!   ever applied to the entry it was requested for.

use clauseai_client::AnalyzeError;
use clauseai_core::{AnalysisResult, ClauseEntry, ClauseId, NEW_CLAUSE_TITLE, UNTITLED_CLAUSE_TITLE};
use tracing::{debug, info, warn};

use crate::StoreError;

/// A pending analysis, bound to the entry that was active when it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub id: ClauseId,
    pub text: String,
}

/// How a finished request landed in the store.
#[derive(Debug)]
pub enum AnalysisOutcome {
    /// Results, title, and loading flag of `id` were updated.
    Applied {
        id: ClauseId,
        clause_type: String,
        risk_score: f64,
    },
    /// The request failed; `id` is idle again with its previous results.
    Failed { id: ClauseId, error: AnalyzeError },
    /// `id` was deleted while the request was in flight; the response was dropped.
    Discarded { id: ClauseId },
}

impl AnalysisOutcome {
    pub fn id(&self) -> ClauseId {
        match self {
            Self::Applied { id, .. } | Self::Failed { id, .. } | Self::Discarded { id } => *id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClauseStore {
    clauses: Vec<ClauseEntry>,
    active: ClauseId,
    next_id: u64,
}

impl Default for ClauseStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ClauseStore {
    /// A session starts with a single empty "New Clause" entry.
    pub fn new() -> Self {
        let first = ClauseId::new(1);
        Self {
            clauses: vec![ClauseEntry::new(first, NEW_CLAUSE_TITLE)],
            active: first,
            next_id: 2,
        }
    }

    /// Entries in creation order.
    pub fn clauses(&self) -> &[ClauseEntry] {
        &self.clauses
    }

    pub fn active_id(&self) -> ClauseId {
        self.active
    }

    pub fn active(&self) -> &ClauseEntry {
        &self.clauses[self.active_index()]
    }

    pub fn get(&self, id: ClauseId) -> Option<&ClauseEntry> {
        self.clauses.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: ClauseId) -> bool {
        self.get(id).is_some()
    }

    /// Append an empty entry and make it active.
    pub fn add_clause(&mut self) -> ClauseId {
        let id = ClauseId::new(self.next_id);
        self.next_id += 1;
        self.clauses.push(ClauseEntry::new(id, UNTITLED_CLAUSE_TITLE));
        self.active = id;
        debug!(%id, total = self.clauses.len(), "clause added");
        id
    }

    /// Remove `id` unless it is the last entry. If it was active, the first
    /// remaining entry becomes active.
    ///
    /// Returns whether anything was removed.
    pub fn delete_clause(&mut self, id: ClauseId) -> bool {
        if self.clauses.len() == 1 || !self.contains(id) {
            return false;
        }
        self.clauses.retain(|c| c.id != id);
        if self.active == id {
            self.active = self.clauses[0].id;
        }
        debug!(%id, active = %self.active, total = self.clauses.len(), "clause deleted");
        true
    }

    /// Replace the active entry's text. Results and loading are untouched.
    pub fn update_active_text(&mut self, text: impl Into<String>) {
        let idx = self.active_index();
        self.clauses[idx].text = text.into();
    }

    /// Load extractor output into the active entry.
    pub fn load_extracted_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        debug!(id = %self.active, chars = text.len(), "loading extracted text");
        self.update_active_text(text);
    }

    pub fn set_active_id(&mut self, id: ClauseId) -> Result<(), StoreError> {
        if !self.contains(id) {
            return Err(StoreError::UnknownClause(id));
        }
        self.active = id;
        Ok(())
    }

    /// Copy the active entry's suggested rewrite into its text.
    ///
    /// Returns `false` when the entry has not been analyzed.
    pub fn apply_rewrite(&mut self) -> bool {
        let Some(rewrite) = self
            .active()
            .results
            .as_ref()
            .map(|r| r.safer_rewrite.clone())
        else {
            return false;
        };
        self.update_active_text(rewrite);
        true
    }

    /// First half of an analysis: mark the active entry as loading and
    /// capture its id and text.
    ///
    /// `None` when the text is empty or a request is already in flight for
    /// this entry.
    pub fn begin_analysis(&mut self) -> Option<AnalysisRequest> {
        let idx = self.active_index();
        let entry = &mut self.clauses[idx];
        if entry.text.is_empty() || entry.loading {
            return None;
        }
        entry.loading = true;
        debug!(id = %entry.id, "analysis started");
        Some(AnalysisRequest {
            id: entry.id,
            text: entry.text.clone(),
        })
    }

    /// Second half of an analysis: apply `outcome` to the entry `id`, whatever
    /// is active now.
    pub fn finish_analysis(
        &mut self,
        id: ClauseId,
        outcome: Result<AnalysisResult, AnalyzeError>,
    ) -> AnalysisOutcome {
        let Some(entry) = self.clauses.iter_mut().find(|c| c.id == id) else {
            match &outcome {
                Ok(_) => debug!(%id, "dropping result for deleted clause"),
                Err(e) => debug!(%id, error = %e, "dropping failure for deleted clause"),
            }
            return AnalysisOutcome::Discarded { id };
        };

        entry.loading = false;
        match outcome {
            Ok(result) => {
                let clause_type = result.clause_type.clone();
                let risk_score = result.risk_score;
                entry.title = clause_type.clone();
                entry.results = Some(result);
                info!(%id, clause_type = %clause_type, risk_score, "analysis applied");
                AnalysisOutcome::Applied {
                    id,
                    clause_type,
                    risk_score,
                }
            }
            Err(error) => {
                warn!(%id, error = %error, "analysis failed");
                AnalysisOutcome::Failed { id, error }
            }
        }
    }

    fn active_index(&self) -> usize {
        self.clauses
            .iter()
            .position(|c| c.id == self.active)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(clause_type: &str, score: f64) -> AnalysisResult {
        AnalysisResult {
            clause_type: clause_type.into(),
            risk_level: None,
            risk_score: score,
            reasons: vec!["reason".into()],
            safer_rewrite: format!("safer {clause_type}"),
            evidence: vec![],
        }
    }

    fn service_error() -> AnalyzeError {
        AnalyzeError::Service {
            status: 500,
            detail: "Service not initialized".into(),
        }
    }

    fn assert_invariants(store: &ClauseStore) {
        assert!(!store.clauses().is_empty());
        assert!(store.contains(store.active_id()));
    }

    #[test]
    fn starts_with_one_active_entry() {
        let store = ClauseStore::new();
        assert_eq!(store.clauses().len(), 1);
        assert_eq!(store.active().title, "New Clause");
        assert_eq!(store.active_id(), store.clauses()[0].id);
    }

    #[test]
    fn add_appends_and_activates() {
        let mut store = ClauseStore::new();
        let first = store.active_id();
        let id = store.add_clause();
        assert_ne!(id, first);
        assert_eq!(store.active_id(), id);
        assert_eq!(store.clauses().last().map(|c| c.id), Some(id));
        assert_eq!(store.active().title, "Untitled Clause");
        assert!(store.active().text.is_empty());
    }

    #[test]
    fn ids_are_never_reused() {
        let mut store = ClauseStore::new();
        let a = store.add_clause();
        assert!(store.delete_clause(a));
        let b = store.add_clause();
        assert_ne!(a, b);
    }

    #[test]
    fn deleting_last_entry_is_noop() {
        let mut store = ClauseStore::new();
        let only = store.active_id();
        assert!(!store.delete_clause(only));
        assert_eq!(store.clauses().len(), 1);
        assert_eq!(store.active_id(), only);
    }

    #[test]
    fn deleting_unknown_id_is_noop() {
        let mut store = ClauseStore::new();
        store.add_clause();
        assert!(!store.delete_clause(ClauseId::new(999)));
        assert_eq!(store.clauses().len(), 2);
    }

    #[test]
    fn deleting_active_selects_first_remaining() {
        let mut store = ClauseStore::new();
        let first = store.active_id();
        let second = store.add_clause();
        let third = store.add_clause();
        store.set_active_id(third).unwrap();

        assert!(store.delete_clause(third));
        // Not the neighbour (second): always index 0.
        assert_eq!(store.active_id(), first);

        store.set_active_id(first).unwrap();
        assert!(store.delete_clause(first));
        assert_eq!(store.active_id(), second);
    }

    #[test]
    fn deleting_inactive_keeps_selection() {
        let mut store = ClauseStore::new();
        let first = store.active_id();
        let second = store.add_clause();
        assert!(store.delete_clause(first));
        assert_eq!(store.active_id(), second);
    }

    #[test]
    fn add_delete_sequences_preserve_invariants() {
        let mut store = ClauseStore::new();
        let mut seed: u64 = 0x5eed;
        for _ in 0..500 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            if seed >> 63 == 0 {
                store.add_clause();
            } else {
                let ids: Vec<ClauseId> = store.clauses().iter().map(|c| c.id).collect();
                let pick = ids[(seed >> 33) as usize % ids.len()];
                store.delete_clause(pick);
            }
            assert_invariants(&store);
        }
    }

    #[test]
    fn update_text_touches_only_active() {
        let mut store = ClauseStore::new();
        let first = store.active_id();
        store.update_active_text("first text");
        let second = store.add_clause();
        store.update_active_text("second text");

        assert_eq!(store.get(first).unwrap().text, "first text");
        assert_eq!(store.get(second).unwrap().text, "second text");
    }

    #[test]
    fn update_text_keeps_results() {
        let mut store = ClauseStore::new();
        store.update_active_text("clause");
        let req = store.begin_analysis().unwrap();
        store.finish_analysis(req.id, Ok(verdict("Termination", 3.0)));

        store.update_active_text("edited");
        assert!(store.active().results.is_some());
        assert!(!store.active().loading);
    }

    #[test]
    fn set_active_requires_existing_id() {
        let mut store = ClauseStore::new();
        let err = store.set_active_id(ClauseId::new(42)).unwrap_err();
        assert!(matches!(err, StoreError::UnknownClause(id) if id == ClauseId::new(42)));
        assert_invariants(&store);
    }

    #[test]
    fn begin_requires_text() {
        let mut store = ClauseStore::new();
        assert!(store.begin_analysis().is_none());
        assert!(!store.active().loading);
    }

    #[test]
    fn begin_twice_is_noop_while_pending() {
        let mut store = ClauseStore::new();
        store.update_active_text("Licensee shall not assign.");
        let req = store.begin_analysis().unwrap();
        assert_eq!(req.text, "Licensee shall not assign.");
        assert!(store.active().loading);
        assert!(store.begin_analysis().is_none());
    }

    #[test]
    fn success_sets_results_title_and_clears_loading() {
        let mut store = ClauseStore::new();
        store.update_active_text("clause");
        let req = store.begin_analysis().unwrap();

        let outcome = store.finish_analysis(req.id, Ok(verdict("Indemnification", 8.0)));
        assert!(matches!(outcome, AnalysisOutcome::Applied { ref clause_type, .. } if clause_type == "Indemnification"));
        let entry = store.active();
        assert!(!entry.loading);
        assert_eq!(entry.title, "Indemnification");
        assert_eq!(entry.results.as_ref().unwrap().risk_score, 8.0);
    }

    #[test]
    fn failure_keeps_prior_results_and_title() {
        let mut store = ClauseStore::new();
        store.update_active_text("clause");
        let req = store.begin_analysis().unwrap();
        store.finish_analysis(req.id, Ok(verdict("Non-Compete", 6.0)));

        let req = store.begin_analysis().unwrap();
        let outcome = store.finish_analysis(req.id, Err(service_error()));

        assert!(matches!(outcome, AnalysisOutcome::Failed { .. }));
        let entry = store.active();
        assert!(!entry.loading);
        assert_eq!(entry.title, "Non-Compete");
        assert_eq!(entry.results.as_ref().unwrap().clause_type, "Non-Compete");
    }

    #[test]
    fn failure_on_fresh_entry_leaves_it_unanalyzed() {
        let mut store = ClauseStore::new();
        store.update_active_text("clause");
        let req = store.begin_analysis().unwrap();
        store.finish_analysis(req.id, Err(service_error()));
        assert!(store.active().results.is_none());
        assert_eq!(store.active().title, "New Clause");
        assert!(store.begin_analysis().is_some(), "retry must be possible");
    }

    #[test]
    fn result_lands_on_originating_entry() {
        let mut store = ClauseStore::new();
        let origin = store.active_id();
        store.update_active_text("origin clause");
        let req = store.begin_analysis().unwrap();

        let other = store.add_clause();
        store.update_active_text("other clause");

        store.finish_analysis(req.id, Ok(verdict("Governing Law", 2.0)));

        let origin_entry = store.get(origin).unwrap();
        assert_eq!(origin_entry.title, "Governing Law");
        assert!(!origin_entry.loading);

        let other_entry = store.get(other).unwrap();
        assert_eq!(store.active_id(), other);
        assert!(other_entry.results.is_none());
        assert!(!other_entry.loading);
        assert_eq!(other_entry.title, "Untitled Clause");
    }

    #[test]
    fn loading_is_per_entry() {
        let mut store = ClauseStore::new();
        let a = store.active_id();
        store.update_active_text("a");
        store.begin_analysis().unwrap();
        let b = store.add_clause();
        store.update_active_text("b");

        assert!(store.get(a).unwrap().loading);
        assert!(!store.get(b).unwrap().loading);
        assert!(store.begin_analysis().is_some());
    }

    #[test]
    fn deleted_entry_is_not_resurrected() {
        let mut store = ClauseStore::new();
        store.update_active_text("doomed");
        let req = store.begin_analysis().unwrap();
        let keep = store.add_clause();
        assert!(store.delete_clause(req.id));

        let outcome = store.finish_analysis(req.id, Ok(verdict("Assignment", 9.0)));
        assert!(matches!(outcome, AnalysisOutcome::Discarded { id } if id == req.id));
        assert_eq!(store.clauses().len(), 1);
        assert!(store.get(req.id).is_none());
        assert!(store.get(keep).unwrap().results.is_none());
    }

    #[test]
    fn apply_rewrite_copies_suggestion() {
        let mut store = ClauseStore::new();
        assert!(!store.apply_rewrite());

        store.update_active_text("risky");
        let req = store.begin_analysis().unwrap();
        store.finish_analysis(req.id, Ok(verdict("Warranty", 5.0)));

        assert!(store.apply_rewrite());
        assert_eq!(store.active().text, "safer Warranty");
        assert!(store.active().results.is_some());
    }

    #[test]
    fn extracted_text_replaces_active_text() {
        let mut store = ClauseStore::new();
        store.update_active_text("old");
        store.load_extracted_text("A\nB\nC");
        assert_eq!(store.active().text, "A\nB\nC");
    }
}
