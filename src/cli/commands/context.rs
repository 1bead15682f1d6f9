use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result};

use super::super::args::CommonArgs;
use crate::{
    config::{Config, load_config},
    core::ConflictReport,
    pipeline::{Pipeline, PublishPlan},
    services::{FileSnapshotStore, FileTreeSource},
};

/// Configuration and collaborators of one command run.
pub struct RunContext {
    pub config: Config,
    pub root_dir: PathBuf,
    pub pipeline: Pipeline,
    pub verbose: bool,
}

impl RunContext {
    pub fn new(common: &CommonArgs) -> Result<Self> {
        let root_dir = std::env::current_dir().context("Failed to read the working directory")?;
        let mut config = load_config(&root_dir)?.config;

        if let Some(dir) = &common.output_dir {
            config.output_dir = dir.display().to_string();
        }

        let credentials = common.credentials.clone().into_credentials();
        let mut pipeline = Pipeline::from_config(&config, &credentials)?;
        if let Some(path) = &common.tree_file {
            pipeline = pipeline.with_tree_source(FileTreeSource::new(path));
        }
        if let Some(path) = &common.snapshot_file {
            pipeline = pipeline.with_snapshot_store(FileSnapshotStore::new(path));
        }
        pipeline = pipeline.allowing_missing_snapshot(common.allow_missing_snapshot);

        Ok(Self {
            config,
            root_dir,
            pipeline,
            verbose: common.verbose,
        })
    }

    pub fn publish_plan(&self, skip_remote_config: bool) -> PublishPlan {
        let plan = PublishPlan::from_config(&self.config);
        if skip_remote_config {
            plan.without_remote_config()
        } else {
            plan
        }
    }

    pub fn conflict_log_path(&self) -> PathBuf {
        self.root_dir.join(&self.config.conflict_log_file)
    }

    /// Write the conflict log when there is something to log.
    pub fn write_conflict_log(&self, conflicts: &ConflictReport) -> Result<Option<PathBuf>> {
        if conflicts.is_empty() {
            return Ok(None);
        }
        let path = self.conflict_log_path();
        write_log(&path, &conflicts.to_log())?;
        tracing::info!(path = %path.display(), labels = conflicts.len(), "conflict log written");
        Ok(Some(path))
    }
}

fn write_log(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)
        .with_context(|| format!("Failed to write conflict log: {}", path.display()))
}
