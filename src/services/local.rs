//! File-backed collaborators.
//!
//! `FileTreeSource` reads a design document previously exported from the
//! design tool. `FileSnapshotStore` keeps the snapshot in a local JSON file and
//! serves as both baseline and repository sink.

use std::fs;
use std::path::{Path, PathBuf};

use super::{Service, ServiceError, SnapshotStore, TreeSource};
use crate::core::{Node, SnapshotTable, parse_document};

pub struct FileTreeSource {
    path: PathBuf,
}

impl FileTreeSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TreeSource for FileTreeSource {
    fn fetch_tree(&self) -> Result<Node, ServiceError> {
        let content = read(&self.path)?;
        parse_document(&content).map_err(|e| {
            ServiceError::decode(Service::LocalFile, format!("{}: {e}", self.path.display()))
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<SnapshotTable, ServiceError> {
        let content = read(&self.path)?;
        SnapshotTable::parse(&content).map_err(|e| {
            ServiceError::decode(Service::LocalFile, format!("{}: {e}", self.path.display()))
        })
    }

    fn store(&self, contents: &str) -> Result<(), ServiceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ServiceError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, contents).map_err(|source| ServiceError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn read(path: &Path) -> Result<String, ServiceError> {
    fs::read_to_string(path).map_err(|source| ServiceError::Io {
        path: path.to_path_buf(),
        source,
    })
}
