//! The gated middle of a run: review the diff, pass the stops, reconcile.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;

use super::error::PipelineError;
use crate::core::{
    ConflictReport, DiffReport, DiffState, Gate, GroupedExtraction, RawExtraction,
    SnapshotTable, compute_diff, detect_conflicts,
};

/// Operator answer to the deletion soft stop, given anew on every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionDecision {
    Confirmed,
    Declined,
}

/// Everything computed before the first gate.
#[derive(Debug, Clone)]
pub struct Review {
    raw: RawExtraction,
    conflicts: ConflictReport,
    diff: DiffReport,
}

impl Review {
    pub fn new(raw: RawExtraction, snapshot: SnapshotTable) -> Self {
        let conflicts = detect_conflicts(&raw);
        let diff = compute_diff(&raw, &snapshot);
        tracing::info!(
            labels = raw.len(),
            published = snapshot.len(),
            rows = diff.rows().len(),
            "diff computed"
        );
        Self {
            raw,
            conflicts,
            diff,
        }
    }

    /// Advisory: never blocks by itself.
    pub fn conflicts(&self) -> &ConflictReport {
        &self.conflicts
    }

    pub fn diff(&self) -> &DiffReport {
        &self.diff
    }

    pub fn gate(&self) -> Gate {
        self.diff.gate()
    }

    /// Pass the stops and hand over the current truth for reconciliation.
    ///
    /// Conflicts are a hard stop whatever the decision. Deletions pass only
    /// with `DeletionDecision::Confirmed`.
    pub fn proceed(self, decision: DeletionDecision) -> Result<Reconciliation, PipelineError> {
        match self.diff.gate() {
            Gate::Blocked => {
                return Err(PipelineError::Blocked {
                    count: self.diff.blocking_rows().count(),
                });
            }
            Gate::NeedsConfirmation if decision != DeletionDecision::Confirmed => {
                let count = self
                    .diff
                    .rows()
                    .iter()
                    .filter(|row| row.state == DiffState::Deleted)
                    .count();
                return Err(PipelineError::DeletionNotConfirmed { count });
            }
            Gate::NeedsConfirmation | Gate::Clear | Gate::UpToDate => {}
        }

        let candidates = self
            .diff
            .review_labels()
            .into_iter()
            .map(str::to_string)
            .collect();

        Ok(Reconciliation {
            mapping: self.raw.grouped(),
            candidates,
            suggestions: Vec::new(),
        })
    }
}

/// A proposed correction. Never applied without an explicit selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionEntry {
    pub key: String,
    pub original: String,
    pub suggested: String,
}

/// Post-gate state: the current truth, the labels open for review and the
/// suggestions computed for them.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    mapping: GroupedExtraction,
    candidates: Vec<String>,
    suggestions: Vec<SuggestionEntry>,
}

impl Reconciliation {
    pub fn mapping(&self) -> &GroupedExtraction {
        &self.mapping
    }

    /// `(label, canonical text)` of every changed or new label.
    pub fn candidates(&self) -> impl Iterator<Item = (&str, &str)> {
        self.candidates.iter().filter_map(|label| {
            self.mapping
                .get(label)
                .map(|value| (label.as_str(), value))
        })
    }

    pub fn suggestions(&self) -> &[SuggestionEntry] {
        &self.suggestions
    }

    pub(crate) fn set_suggestions(&mut self, suggestions: Vec<SuggestionEntry>) {
        self.suggestions = suggestions;
    }

    /// Build the final mapping, replacing the text of every selected label with
    /// its suggestion.
    ///
    /// Selecting a label without a suggestion is an error.
    pub fn apply_selection(
        &self,
        labels: &BTreeSet<String>,
    ) -> Result<FinalMapping, PipelineError> {
        let unknown: Vec<String> = labels
            .iter()
            .filter(|label| !self.suggestions.iter().any(|s| &s.key == *label))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(PipelineError::UnknownSelection(unknown));
        }

        let mut values = self.mapping.clone().into_inner();
        for suggestion in self.suggestions.iter().filter(|s| labels.contains(&s.key)) {
            if let Some(value) = values.get_mut(&suggestion.key) {
                *value = suggestion.suggested.clone();
            }
        }

        tracing::info!(
            labels = values.len(),
            corrections = labels.len(),
            "final mapping ready"
        );
        Ok(FinalMapping { values })
    }
}

/// The reconciled table handed to the publisher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FinalMapping {
    values: IndexMap<String, String>,
}

impl FinalMapping {
    pub fn get(&self, label: &str) -> Option<&str> {
        self.values.get(label).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(label, value)| (label.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FinalMapping
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
