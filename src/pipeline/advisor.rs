//! Spelling suggestions for changed and new labels.

use serde::Serialize;

use super::review::SuggestionEntry;
use crate::services::Corrector;

/// A label whose correction request failed. It keeps its original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorrectionFailure {
    pub key: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuggestionReport {
    pub suggestions: Vec<SuggestionEntry>,
    pub failures: Vec<CorrectionFailure>,
    /// Number of labels sent for correction.
    pub reviewed: usize,
}

/// Ask the corrector about every candidate, one request at a time.
///
/// A reply equal to the input yields no suggestion. A failed request is
/// logged and recorded; it never aborts the batch.
pub fn suggest_corrections<'a, I>(corrector: &dyn Corrector, candidates: I) -> SuggestionReport
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut report = SuggestionReport::default();

    for (key, original) in candidates {
        report.reviewed += 1;
        match corrector.correct(original) {
            Ok(suggested) if suggested != original => {
                tracing::debug!(%key, "correction suggested");
                report.suggestions.push(SuggestionEntry {
                    key: key.to_string(),
                    original: original.to_string(),
                    suggested,
                });
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(
                    %key,
                    error = %err,
                    "correction request failed, keeping original text"
                );
                report.failures.push(CorrectionFailure {
                    key: key.to_string(),
                    error: err.to_string(),
                });
            }
        }
    }

    tracing::info!(
        reviewed = report.reviewed,
        suggestions = report.suggestions.len(),
        failures = report.failures.len(),
        "spelling review finished"
    );
    report
}
