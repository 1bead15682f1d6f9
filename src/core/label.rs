//! Label naming rules.

use std::sync::LazyLock;

use regex::Regex;

/// Labels become identifiers in generated code: lowercase ASCII letters,
/// digits and underscores only.
pub const LABEL_PATTERN: &str = r"^[a-z0-9_]+$";

static LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(LABEL_PATTERN).expect("label pattern is a valid regex"));

pub fn is_valid_label(label: &str) -> bool {
    LABEL_RE.is_match(label)
}
