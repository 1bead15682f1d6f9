//! Diff between the current extraction and the published snapshot.
//!
//! Every label of `current ∪ baseline` lands in at most one state; a label whose
//! single current value equals its baseline value produces no row. States are
//! evaluated in precedence order: invalid key, identical keys, changed, new,
//! and finally deleted in a second pass over the baseline.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use super::conflicts::distinct_values;
use super::label::is_valid_label;
use super::snapshot::SnapshotTable;
use super::tree::RawExtraction;

/// Placeholder for a value absent on one side of the diff.
pub const ABSENT: &str = "-";

/// Baseline column of an invalid-key row.
pub const INVALID_NAME: &str = "invalid name";

/// Classification of a diff row.
///
/// Variant order is display order: destructive and ambiguous changes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffState {
    /// In the baseline, gone from the design.
    Deleted,
    /// Label fails the naming rule.
    InvalidKey,
    /// Same label used with different texts in the design.
    IdenticalKeys,
    /// Reserved. No classification pass produces it, but it is still treated
    /// as blocking and hidden from the regular listing.
    Conflict,
    /// Text differs from the baseline.
    Changed,
    /// Not in the baseline yet.
    New,
}

impl DiffState {
    pub const ALL: [DiffState; 6] = [
        DiffState::Deleted,
        DiffState::InvalidKey,
        DiffState::IdenticalKeys,
        DiffState::Conflict,
        DiffState::Changed,
        DiffState::New,
    ];

    /// Hard stop: the design must be fixed, no confirmation can bypass it.
    pub fn is_blocking(self) -> bool {
        matches!(
            self,
            DiffState::InvalidKey | DiffState::IdenticalKeys | DiffState::Conflict
        )
    }

    /// Eligible for spelling review.
    pub fn is_reviewable(self) -> bool {
        matches!(self, DiffState::Changed | DiffState::New)
    }
}

impl fmt::Display for DiffState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffState::Deleted => write!(f, "deleted"),
            DiffState::InvalidKey => write!(f, "invalid key"),
            DiffState::IdenticalKeys => write!(f, "identical keys"),
            DiffState::Conflict => write!(f, "conflict"),
            DiffState::Changed => write!(f, "changed"),
            DiffState::New => write!(f, "new"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffRow {
    pub key: String,
    pub figma_value: String,
    pub github_value: String,
    pub state: DiffState,
}

impl DiffRow {
    fn new(
        key: impl Into<String>,
        figma_value: impl Into<String>,
        github_value: impl Into<String>,
        state: DiffState,
    ) -> Self {
        Self {
            key: key.into(),
            figma_value: figma_value.into(),
            github_value: github_value.into(),
            state,
        }
    }
}

/// What a run may do next, given its diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Nothing differs; there is nothing to publish.
    UpToDate,
    /// Invalid or conflicting labels. The design must be fixed first.
    Blocked,
    /// Labels would be deleted; the operator must confirm on this run.
    NeedsConfirmation,
    /// Free to continue.
    Clear,
}

/// Ordered diff rows of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DiffReport {
    rows: Vec<DiffRow>,
}

impl DiffReport {
    pub fn rows(&self) -> &[DiffRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_conflicts(&self) -> bool {
        self.rows.iter().any(|row| row.state.is_blocking())
    }

    pub fn has_deleted(&self) -> bool {
        self.rows.iter().any(|row| row.state == DiffState::Deleted)
    }

    pub fn gate(&self) -> Gate {
        if self.rows.is_empty() {
            Gate::UpToDate
        } else if self.has_conflicts() {
            Gate::Blocked
        } else if self.has_deleted() {
            Gate::NeedsConfirmation
        } else {
            Gate::Clear
        }
    }

    /// Rows to show the operator.
    ///
    /// With conflicts present only the blocking rows are shown, since nothing
    /// else can proceed until they are fixed.
    pub fn visible_rows(&self) -> Vec<&DiffRow> {
        if self.has_conflicts() {
            self.blocking_rows().collect()
        } else {
            self.rows
                .iter()
                .filter(|row| row.state != DiffState::Conflict)
                .collect()
        }
    }

    pub fn blocking_rows(&self) -> impl Iterator<Item = &DiffRow> {
        self.rows.iter().filter(|row| row.state.is_blocking())
    }

    /// Labels classified as changed or new, in row order.
    pub fn review_labels(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|row| row.state.is_reviewable())
            .map(|row| row.key.as_str())
            .collect()
    }

    /// State assigned to a label, `None` when it is unchanged or unknown.
    pub fn state_of(&self, label: &str) -> Option<DiffState> {
        self.rows
            .iter()
            .find(|row| row.key == label)
            .map(|row| row.state)
    }

    /// Number of rows per state, in display order, skipping empty states.
    pub fn counts(&self) -> Vec<(DiffState, usize)> {
        DiffState::ALL
            .iter()
            .map(|state| {
                let count = self.rows.iter().filter(|row| row.state == *state).count();
                (*state, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

/// Classify every label of `current` and `baseline`.
pub fn compute_diff(current: &RawExtraction, baseline: &SnapshotTable) -> DiffReport {
    let mut rows = Vec::new();
    let mut invalid: HashSet<&str> = HashSet::new();

    for (label, values) in current.iter() {
        if is_valid_label(label) {
            continue;
        }
        invalid.insert(label);
        rows.extend(
            values
                .iter()
                .map(|value| DiffRow::new(label, value, INVALID_NAME, DiffState::InvalidKey)),
        );
    }

    for (label, values) in current.iter() {
        if invalid.contains(label) {
            continue;
        }

        let distinct = distinct_values(values);
        let published = baseline.get(label);

        if distinct.len() > 1 {
            let github_value = published.unwrap_or(ABSENT);
            rows.extend(distinct.into_iter().map(|value| {
                DiffRow::new(label, value, github_value, DiffState::IdenticalKeys)
            }));
            continue;
        }

        let Some(value) = values.first() else {
            continue;
        };
        match published {
            Some(published) if published != value.as_str() => {
                rows.push(DiffRow::new(label, value, published, DiffState::Changed));
            }
            Some(_) => {}
            None => rows.push(DiffRow::new(label, value, ABSENT, DiffState::New)),
        }
    }

    for (label, published) in baseline.iter() {
        if !current.contains(label) {
            rows.push(DiffRow::new(label, ABSENT, published, DiffState::Deleted));
        }
    }

    // Stable: rows of one state keep generation order.
    rows.sort_by_key(|row| row.state);

    DiffReport { rows }
}
