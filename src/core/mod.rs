//! Diff-and-reconciliation engine.
//!
//! Pure functions only: nothing in this module performs I/O.
//!
//! ## Module Structure
//!
//! - `tree`: Design document model and text extraction
//! - `label`: Label naming rule
//! - `conflicts`: Advisory report of labels used with different texts
//! - `snapshot`: Previously published string table
//! - `diff`: Blocking classification of current vs published state

pub mod conflicts;
pub mod diff;
pub mod label;
pub mod snapshot;
pub mod tree;

pub use conflicts::{ConflictReport, LabelConflict, detect_conflicts};
pub use diff::{ABSENT, DiffReport, DiffRow, DiffState, Gate, INVALID_NAME, compute_diff};
pub use label::{LABEL_PATTERN, is_valid_label};
pub use snapshot::{SnapshotError, SnapshotTable};
pub use tree::{
    GroupedExtraction, Node, RawExtraction, TextEntry, extract_entries, extract_raw,
    parse_document,
};
