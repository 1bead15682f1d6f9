use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::services::ServiceError;

/// An external capability the pipeline may need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    TreeSource,
    SnapshotStore,
    Correction,
    RemoteConfig,
}

impl Capability {
    /// What enables the capability.
    pub fn requirement(self) -> &'static str {
        match self {
            Capability::TreeSource => "FIGMA_TOKEN and figmaFileKey, or --tree-file",
            Capability::SnapshotStore => {
                "GITHUB_TOKEN and a snapshot location in the config, or --snapshot-file"
            }
            Capability::Correction => "GEMINI_API_KEY",
            Capability::RemoteConfig => "FIREBASE_CREDENTIALS_JSON",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::TreeSource => write!(f, "tree source"),
            Capability::SnapshotStore => write!(f, "snapshot store"),
            Capability::Correction => write!(f, "spelling correction"),
            Capability::RemoteConfig => write!(f, "remote config"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("capability unavailable: {0} (requires {req})", req = .0.requirement())]
    CapabilityUnavailable(Capability),

    #[error("failed to fetch the design tree from {origin}: {source}")]
    TreeFetch {
        origin: String,
        #[source]
        source: ServiceError,
    },

    #[error("failed to load the snapshot from {origin}: {source}")]
    SnapshotFetch {
        origin: String,
        #[source]
        source: ServiceError,
    },

    #[error("run blocked: {count} invalid or conflicting row(s) must be fixed in the design")]
    Blocked { count: usize },

    #[error("deletion of {count} label(s) was not confirmed")]
    DeletionNotConfirmed { count: usize },

    #[error("no suggestion exists for the selected label(s): {}", .0.join(", "))]
    UnknownSelection(Vec<String>),

    #[error("failed to write {}: {source}", .path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize the string table: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Service(#[from] ServiceError),
}
