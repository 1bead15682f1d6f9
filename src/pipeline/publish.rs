//! Exports and sink writes for the final mapping.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::PipelineError;
use super::review::FinalMapping;
use crate::config::Config;
use crate::core::GroupedExtraction;
use crate::services::ServiceError;

/// Swift keywords that need backticks when used as a constant name.
const SWIFT_KEYWORDS: &[&str] = &[
    "associatedtype", "break", "case", "catch", "class", "continue", "default", "defer", "deinit",
    "do", "else", "enum", "extension", "fallthrough", "false", "fileprivate", "for", "func",
    "guard", "if", "import", "in", "init", "inout", "internal", "is", "let", "nil", "operator",
    "private", "protocol", "public", "repeat", "rethrows", "return", "self", "static", "struct",
    "subscript", "super", "switch", "throw", "throws", "true", "try", "typealias", "var", "where",
    "while",
];

/// What a publish writes and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishPlan {
    pub output_dir: PathBuf,
    pub json_file_name: String,
    pub localizable_file_name: String,
    pub constants_file_name: String,
    pub constants_type_name: String,
    /// Send the mapping to the remote-config sink.
    pub remote_config: bool,
    /// Commit the mapping to the repository sink.
    pub repository: bool,
}

impl PublishPlan {
    pub fn from_config(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir(),
            json_file_name: config.json_file_name.clone(),
            localizable_file_name: config.localizable_file_name.clone(),
            constants_file_name: config.constants_file_name.clone(),
            constants_type_name: config.constants_type_name.clone(),
            remote_config: true,
            repository: true,
        }
    }

    pub fn without_remote_config(mut self) -> Self {
        self.remote_config = false;
        self
    }

    /// Paths of the three exports, in write order.
    pub fn export_paths(&self) -> [PathBuf; 3] {
        [
            self.output_dir.join(&self.json_file_name),
            self.output_dir.join(&self.localizable_file_name),
            self.output_dir.join(&self.constants_file_name),
        ]
    }
}

/// Outcome of one sink write.
#[derive(Debug)]
pub struct SinkOutcome {
    pub sink: &'static str,
    pub target: String,
    pub error: Option<ServiceError>,
}

impl SinkOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Default)]
pub struct PublishReport {
    pub exports: Vec<PathBuf>,
    pub sinks: Vec<SinkOutcome>,
}

impl PublishReport {
    pub fn is_success(&self) -> bool {
        self.sinks.iter().all(SinkOutcome::is_ok)
    }

    pub fn failures(&self) -> impl Iterator<Item = &SinkOutcome> {
        self.sinks.iter().filter(|outcome| !outcome.is_ok())
    }
}

/// Flat JSON object, 2-space indent, non-ASCII kept as is.
pub fn render_json(mapping: &FinalMapping) -> Result<String, PipelineError> {
    Ok(serde_json::to_string_pretty(mapping)?)
}

/// Single-line JSON carried as the remote-config parameter value.
pub fn render_compact_json(mapping: &FinalMapping) -> Result<String, PipelineError> {
    Ok(serde_json::to_string(mapping)?)
}

/// `Localizable.strings` body: one `"key" = "value";` line per entry.
pub fn render_localizable(mapping: &FinalMapping) -> String {
    let mut out = String::new();
    for (label, value) in mapping.iter() {
        let _ = writeln!(
            out,
            "\"{}\" = \"{}\";",
            escape_strings_literal(label),
            escape_strings_literal(value)
        );
    }
    out
}

/// Swift enum exposing one `NSLocalizedString` constant per label.
pub fn render_constants(mapping: &FinalMapping, type_name: &str) -> String {
    let mut out = format!("enum {type_name} {{\n");
    for (label, _) in mapping.iter() {
        let _ = writeln!(
            out,
            "    static let {} = NSLocalizedString(\"{}\", comment: \"\")",
            swift_identifier(label),
            escape_strings_literal(label)
        );
    }
    out.push_str("}\n");
    out
}

fn escape_strings_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn swift_identifier(label: &str) -> String {
    if label.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{label}")
    } else if SWIFT_KEYWORDS.contains(&label) {
        format!("`{label}`")
    } else {
        label.to_string()
    }
}

/// Write the three exports into the plan's output directory.
pub fn write_exports(
    mapping: &FinalMapping,
    plan: &PublishPlan,
) -> Result<Vec<PathBuf>, PipelineError> {
    let [json_path, localizable_path, constants_path] = plan.export_paths();

    write_file(&json_path, &format!("{}\n", render_json(mapping)?))?;
    write_file(&localizable_path, &render_localizable(mapping))?;
    write_file(
        &constants_path,
        &render_constants(mapping, &plan.constants_type_name),
    )?;

    tracing::info!(
        dir = %plan.output_dir.display(),
        labels = mapping.len(),
        "exports written"
    );
    Ok(vec![json_path, localizable_path, constants_path])
}

/// Persist the grouped extraction as pretty JSON, before any review.
pub fn write_original_snapshot(
    grouped: &GroupedExtraction,
    path: &Path,
) -> Result<(), PipelineError> {
    let json = grouped.to_json_pretty()?;
    write_file(path, &format!("{json}\n"))
}

pub(crate) fn write_file(path: &Path, contents: &str) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| PipelineError::Export {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, contents).map_err(|source| PipelineError::Export {
        path: path.to_path_buf(),
        source,
    })
}
