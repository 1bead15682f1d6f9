use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{Context, Ok, Result};
use insta_cmd::get_cargo_bin;
use serde_json::{Value, json};
use tempfile::TempDir;

mod diff;
mod extract;
mod init;
mod sync;

const BIN_NAME: &str = "strsync";

pub const TREE_FILE: &str = "design.json";
pub const SNAPSHOT_FILE: &str = "published/strings.json";

pub struct CliTest {
    _temp_dir: TempDir,
    project_dir: PathBuf,
}

impl CliTest {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().canonicalize()?;
        // Stop the config lookup at the project root.
        fs::create_dir(project_dir.join(".git"))?;
        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    /// A project with a design export holding `texts` and a published
    /// snapshot holding `published`.
    pub fn with_strings(texts: &[(&str, &str)], published: Value) -> Result<Self> {
        let test = Self::new()?;
        test.write_file(TREE_FILE, &design(texts).to_string())?;
        test.write_file(SNAPSHOT_FILE, &serde_json::to_string_pretty(&published)?)?;
        Ok(test)
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.project_dir
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin(BIN_NAME));
        cmd.current_dir(&self.project_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        cmd.env("RUST_LOG", "off"); // Keep log lines out of snapshots
        cmd
    }

    /// A pipeline command reading the local design and snapshot files.
    pub fn pipeline_command(&self, name: &str) -> Command {
        let mut cmd = self.command();
        cmd.arg(name)
            .arg("--tree-file")
            .arg(TREE_FILE)
            .arg("--snapshot-file")
            .arg(SNAPSHOT_FILE);
        cmd
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }

    pub fn exists(&self, path: &str) -> bool {
        self.project_dir.join(path).exists()
    }
}

/// A design document with one frame per text, like a real export.
pub fn design(texts: &[(&str, &str)]) -> Value {
    let frames: Vec<Value> = texts
        .iter()
        .map(|(name, characters)| {
            json!({
                "type": "FRAME",
                "name": "Screen",
                "children": [{ "type": "TEXT", "name": name, "characters": characters }]
            })
        })
        .collect();
    json!({ "name": "App", "document": { "type": "DOCUMENT", "children": frames } })
}
