//! Advisory detection of labels used with different texts.
//!
//! This report never stops a run. The blocking counterpart is the
//! `IdenticalKeys` state of the diff, computed separately in `core::diff`.

use std::collections::BTreeSet;
use std::fmt::Write;

use super::tree::RawExtraction;

/// A label observed with more than one distinct text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelConflict {
    pub label: String,
    /// Distinct values, sorted.
    pub values: BTreeSet<String>,
}

/// Labels whose distinct value set has more than one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictReport {
    pub conflicts: Vec<LabelConflict>,
}

impl ConflictReport {
    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.conflicts.iter().any(|c| c.label == label)
    }

    /// Plain-text log of every conflict.
    pub fn to_log(&self) -> String {
        let mut log = String::new();
        for conflict in &self.conflicts {
            let _ = writeln!(log, "{}:", conflict.label);
            for value in &conflict.values {
                let _ = writeln!(log, "    - \"{}\"", value);
            }
        }
        log
    }
}

pub fn distinct_values(values: &[String]) -> BTreeSet<String> {
    values.iter().cloned().collect()
}

/// Flag every label whose values disagree.
///
/// Uses value sets, so the result does not depend on traversal order or on
/// how often a value repeats.
pub fn detect_conflicts(raw: &RawExtraction) -> ConflictReport {
    let mut conflicts: Vec<LabelConflict> = raw
        .iter()
        .filter_map(|(label, values)| {
            let distinct = distinct_values(values);
            (distinct.len() > 1).then(|| LabelConflict {
                label: label.to_string(),
                values: distinct,
            })
        })
        .collect();

    conflicts.sort_by(|a, b| a.label.cmp(&b.label));

    for conflict in &conflicts {
        tracing::warn!(
            label = %conflict.label,
            distinct_values = conflict.values.len(),
            "same label used with different texts"
        );
    }

    ConflictReport { conflicts }
}
