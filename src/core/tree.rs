//! Document tree model and text extraction.
//!
//! The design tool returns a deeply nested node tree. Only `TEXT` nodes carry
//! a label (`name`) and a text (`characters`); every other node exists purely
//! for traversal. Extraction is a pre-order depth-first walk that never stops
//! descending, so TEXT nodes nested below other TEXT nodes are still found.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Node type tag that marks a text layer.
pub const TEXT_NODE_TYPE: &str = "TEXT";

/// A single node of the design document.
///
/// Unknown fields of the design-tool payload are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Node {
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            ..Default::default()
        }
    }

    /// Create a TEXT node with the given label and text.
    pub fn text(name: impl Into<String>, characters: impl Into<String>) -> Self {
        Self {
            node_type: TEXT_NODE_TYPE.to_string(),
            name: Some(name.into()),
            characters: Some(characters.into()),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Returns `(label, text)` if this node contributes to the extraction.
    ///
    /// A node contributes iff it is a TEXT node and both its name and its
    /// characters are non-empty.
    pub fn labeled_text(&self) -> Option<(&str, &str)> {
        if self.node_type != TEXT_NODE_TYPE {
            return None;
        }
        match (self.name.as_deref(), self.characters.as_deref()) {
            (Some(name), Some(characters)) if !name.is_empty() && !characters.is_empty() => {
                Some((name, characters))
            }
            _ => None,
        }
    }

    /// Pre-order depth-first visit of this node and all its descendants.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// File payload returned by the design tool: the tree lives under `document`.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentFile {
    pub document: Node,
}

/// Parse a design document from JSON.
///
/// Accepts both the full file payload (`{"document": {...}}`) and a bare node.
pub fn parse_document(json: &str) -> serde_json::Result<Node> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if value.get("document").is_some() {
        let file: DocumentFile = serde_json::from_value(value)?;
        Ok(file.document)
    } else {
        serde_json::from_value(value)
    }
}

/// One `(label, text)` pair of the flat extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEntry {
    pub label: String,
    pub value: String,
}

/// Collect every contributing TEXT node as a flat, ordered list.
///
/// Duplicates are preserved; order is traversal order.
pub fn extract_entries(root: &Node) -> Vec<TextEntry> {
    let mut entries = Vec::new();
    root.walk(&mut |node| {
        if let Some((label, value)) = node.labeled_text() {
            entries.push(TextEntry {
                label: label.to_string(),
                value: value.to_string(),
            });
        }
    });
    entries
}

/// Collect every contributing TEXT node grouped by label.
pub fn extract_raw(root: &Node) -> RawExtraction {
    let mut raw = RawExtraction::default();
    root.walk(&mut |node| {
        if let Some((label, value)) = node.labeled_text() {
            raw.push(label, value);
        }
    });
    raw
}

/// Label to every value observed under it, in traversal order.
///
/// Labels iterate in first-appearance order. Every label maps to a non-empty
/// sequence; the only way to add a label is to add a value for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RawExtraction {
    values: IndexMap<String, Vec<String>>,
}

impl RawExtraction {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = TextEntry>,
    {
        let mut raw = Self::default();
        for entry in entries {
            raw.push(entry.label, entry.value);
        }
        raw
    }

    pub fn push(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.values
            .entry(label.into())
            .or_default()
            .push(value.into());
    }

    pub fn get(&self, label: &str) -> Option<&[String]> {
        self.values.get(label).map(Vec::as_slice)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.values.contains_key(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values
            .iter()
            .map(|(label, values)| (label.as_str(), values.as_slice()))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Total number of extracted texts, duplicates included.
    pub fn total_values(&self) -> usize {
        self.values.values().map(Vec::len).sum()
    }

    /// Keep only the first value observed for each label.
    pub fn grouped(&self) -> GroupedExtraction {
        GroupedExtraction {
            values: self
                .values
                .iter()
                .filter_map(|(label, values)| {
                    values.first().map(|first| (label.clone(), first.clone()))
                })
                .collect(),
        }
    }
}

/// Label to its first observed value. The "current truth" of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GroupedExtraction {
    values: IndexMap<String, String>,
}

impl GroupedExtraction {
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

    pub fn into_inner(self) -> IndexMap<String, String> {
        self.values
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.values)
    }
}
