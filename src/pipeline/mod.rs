//! The sync run: fetch, review, reconcile, publish.
//!
//! A `Pipeline` holds the external collaborators enabled by the credentials.
//! Each step that needs a missing collaborator fails with
//! `PipelineError::CapabilityUnavailable` before touching anything.
//!
//! ```text
//! fetch_extraction ─┐
//!                   ├─> review ─> proceed ─> compute_suggestions ─> apply_selection ─> publish
//! fetch_snapshot ───┘
//! ```

pub mod advisor;
pub mod error;
pub mod publish;
pub mod review;

pub use advisor::{CorrectionFailure, SuggestionReport, suggest_corrections};
pub use error::{Capability, PipelineError};
pub use publish::{
    PublishPlan, PublishReport, SinkOutcome, render_compact_json, render_constants, render_json,
    render_localizable, write_exports, write_original_snapshot,
};
pub use review::{DeletionDecision, FinalMapping, Reconciliation, Review, SuggestionEntry};

use crate::config::{Config, Credentials};
use crate::core::{RawExtraction, SnapshotTable, extract_raw};
use crate::services::{
    Corrector, FigmaClient, FirebaseRemoteConfig, GeminiCorrector, GithubContents,
    RemoteConfigSink, RepoFile, ServiceAccountKey, SnapshotStore, TreeSource,
};

#[derive(Default)]
pub struct Pipeline {
    tree_source: Option<Box<dyn TreeSource>>,
    snapshot_store: Option<Box<dyn SnapshotStore>>,
    corrector: Option<Box<dyn Corrector>>,
    remote_config: Option<Box<dyn RemoteConfigSink>>,
    allow_missing_snapshot: bool,
}

impl Pipeline {
    /// Wire up the HTTP collaborators for every credential present.
    ///
    /// A malformed service-account key is an error here rather than a
    /// disabled capability.
    pub fn from_config(config: &Config, credentials: &Credentials) -> Result<Self, PipelineError> {
        let mut pipeline = Self::default();

        match &credentials.figma_token {
            Some(token) if !config.figma_file_key.is_empty() => {
                pipeline.tree_source = Some(Box::new(FigmaClient::new(
                    &config.figma_api_url,
                    token,
                    &config.figma_file_key,
                )?));
            }
            _ => {}
        }

        if let (Some(token), Some(snapshot)) = (&credentials.github_token, &config.snapshot) {
            pipeline.snapshot_store = Some(Box::new(GithubContents::new(
                &config.github_api_url,
                token,
                RepoFile::from(snapshot),
                &config.commit_message,
            )?));
        }

        if let Some(key) = &credentials.correction_api_key {
            pipeline.corrector = Some(Box::new(GeminiCorrector::new(
                &config.correction_api_url,
                key,
                &config.correction_model,
                &config.correction_prompt,
            )?));
        }

        if let Some(json) = &credentials.remote_config_credentials {
            let key = ServiceAccountKey::from_json(json)?;
            pipeline.remote_config = Some(Box::new(FirebaseRemoteConfig::new(
                &config.remote_config_api_url,
                key,
                &config.remote_config_parameter,
            )?));
        }

        tracing::debug!(
            tree_source = pipeline.tree_source.is_some(),
            snapshot_store = pipeline.snapshot_store.is_some(),
            correction = pipeline.corrector.is_some(),
            remote_config = pipeline.remote_config.is_some(),
            "pipeline capabilities"
        );
        Ok(pipeline)
    }

    pub fn with_tree_source(mut self, source: impl TreeSource + 'static) -> Self {
        self.tree_source = Some(Box::new(source));
        self
    }

    pub fn with_snapshot_store(mut self, store: impl SnapshotStore + 'static) -> Self {
        self.snapshot_store = Some(Box::new(store));
        self
    }

    pub fn with_corrector(mut self, corrector: impl Corrector + 'static) -> Self {
        self.corrector = Some(Box::new(corrector));
        self
    }

    pub fn with_remote_config(mut self, sink: impl RemoteConfigSink + 'static) -> Self {
        self.remote_config = Some(Box::new(sink));
        self
    }

    /// Start from an empty baseline when the snapshot does not exist yet.
    pub fn allowing_missing_snapshot(mut self, allow: bool) -> Self {
        self.allow_missing_snapshot = allow;
        self
    }

    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::TreeSource => self.tree_source.is_some(),
            Capability::SnapshotStore => self.snapshot_store.is_some(),
            Capability::Correction => self.corrector.is_some(),
            Capability::RemoteConfig => self.remote_config.is_some(),
        }
    }

    fn require(&self, capability: Capability) -> Result<(), PipelineError> {
        if self.has(capability) {
            Ok(())
        } else {
            Err(PipelineError::CapabilityUnavailable(capability))
        }
    }

    /// Fetch the design tree and extract every labeled text.
    pub fn fetch_extraction(&self) -> Result<RawExtraction, PipelineError> {
        let source = self
            .tree_source
            .as_deref()
            .ok_or(PipelineError::CapabilityUnavailable(Capability::TreeSource))?;

        let tree = source.fetch_tree().map_err(|source_err| PipelineError::TreeFetch {
            origin: source.describe(),
            source: source_err,
        })?;
        let raw = extract_raw(&tree);
        tracing::info!(
            origin = %source.describe(),
            labels = raw.len(),
            texts = raw.total_values(),
            "design tree extracted"
        );
        Ok(raw)
    }

    /// Load the last published snapshot.
    pub fn fetch_snapshot(&self) -> Result<SnapshotTable, PipelineError> {
        let store = self
            .snapshot_store
            .as_deref()
            .ok_or(PipelineError::CapabilityUnavailable(Capability::SnapshotStore))?;

        let table = match store.load() {
            Ok(table) => table,
            Err(err) if self.allow_missing_snapshot && err.is_not_found() => {
                tracing::warn!(origin = %store.describe(), "no published snapshot, starting empty");
                SnapshotTable::default()
            }
            Err(source) => {
                return Err(PipelineError::SnapshotFetch {
                    origin: store.describe(),
                    source,
                });
            }
        };
        tracing::info!(origin = %store.describe(), labels = table.len(), "snapshot loaded");
        Ok(table)
    }

    /// Fetch both sides and compute the review.
    pub fn review(&self) -> Result<Review, PipelineError> {
        let raw = self.fetch_extraction()?;
        let snapshot = self.fetch_snapshot()?;
        Ok(Review::new(raw, snapshot))
    }

    /// Ask for a correction of every changed or new label and keep the
    /// suggestions on the reconciliation for a later `apply_selection`.
    pub fn compute_suggestions(
        &self,
        reconciliation: &mut Reconciliation,
    ) -> Result<SuggestionReport, PipelineError> {
        let corrector = self
            .corrector
            .as_deref()
            .ok_or(PipelineError::CapabilityUnavailable(Capability::Correction))?;

        let report = suggest_corrections(corrector, reconciliation.candidates());
        reconciliation.set_suggestions(report.suggestions.clone());
        Ok(report)
    }

    /// Write the exports, then the remote-config sink, then the repository.
    ///
    /// Sink failures are recorded in the report and do not stop the next sink.
    pub fn publish(
        &self,
        mapping: &FinalMapping,
        plan: &PublishPlan,
    ) -> Result<PublishReport, PipelineError> {
        if plan.remote_config {
            self.require(Capability::RemoteConfig)?;
        }
        if plan.repository {
            self.require(Capability::SnapshotStore)?;
        }

        let mut report = PublishReport {
            exports: write_exports(mapping, plan)?,
            sinks: Vec::new(),
        };

        if let Some(sink) = self.remote_config.as_deref().filter(|_| plan.remote_config) {
            let payload = render_compact_json(mapping)?;
            let error = sink.publish(&payload).err();
            log_outcome("remote config", &sink.describe(), error.as_ref());
            report.sinks.push(SinkOutcome {
                sink: "remote config",
                target: sink.describe(),
                error,
            });
        }

        if let Some(store) = self.snapshot_store.as_deref().filter(|_| plan.repository) {
            let contents = format!("{}\n", render_json(mapping)?);
            let error = store.store(&contents).err();
            log_outcome("repository", &store.describe(), error.as_ref());
            report.sinks.push(SinkOutcome {
                sink: "repository",
                target: store.describe(),
                error,
            });
        }

        Ok(report)
    }
}

fn log_outcome(sink: &str, target: &str, error: Option<&crate::services::ServiceError>) {
    match error {
        None => tracing::info!(sink, target, "published"),
        Some(err) => tracing::warn!(sink, target, error = %err, "publish failed"),
    }
}
