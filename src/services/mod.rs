//! External collaborators of the sync pipeline.
//!
//! Each collaborator is a trait so the pipeline can be driven by the real
//! HTTP clients, by local files, or by in-memory doubles in tests. All calls
//! are blocking and issued one at a time.
//!
//! ## Module Structure
//!
//! - `figma`: Design document source
//! - `github`: Repository contents API (snapshot read and conditional write)
//! - `remote_config`: Firebase Remote Config with service-account auth
//! - `gemini`: Spelling correction
//! - `local`: File-backed tree source and snapshot store

pub mod error;
pub mod figma;
pub mod gemini;
pub mod github;
pub mod local;
pub mod remote_config;

#[cfg(test)]
pub(crate) mod http_stub;

use std::time::Duration;

use reqwest::blocking::{Client, Response};

pub use error::{Service, ServiceError};
pub use figma::FigmaClient;
pub use gemini::GeminiCorrector;
pub use github::{GithubContents, RepoFile};
pub use local::{FileSnapshotStore, FileTreeSource};
pub use remote_config::{FirebaseRemoteConfig, ServiceAccountKey};

use crate::core::{Node, SnapshotTable};

/// Timeout applied to every HTTP call.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Read-only source of the design document.
pub trait TreeSource {
    fn fetch_tree(&self) -> Result<Node, ServiceError>;

    /// Human-readable origin, used in logs and reports.
    fn describe(&self) -> String;
}

/// Repository sink holding the published snapshot.
pub trait SnapshotStore {
    fn load(&self) -> Result<SnapshotTable, ServiceError>;

    /// Overwrite the snapshot with `contents`.
    ///
    /// Implementations backed by a versioned store make the write conditional
    /// on the version they last observed.
    fn store(&self, contents: &str) -> Result<(), ServiceError>;

    fn describe(&self) -> String;
}

/// Remote-config sink receiving the whole mapping as one string parameter.
pub trait RemoteConfigSink {
    fn publish(&self, serialized: &str) -> Result<(), ServiceError>;

    fn describe(&self) -> String;
}

/// Text correction capability: one text per request.
pub trait Corrector {
    fn correct(&self, text: &str) -> Result<String, ServiceError>;
}

pub(crate) fn http_client(service: Service) -> Result<Client, ServiceError> {
    let builder = Client::builder()
        .timeout(HTTP_TIMEOUT)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
    // Test servers listen on loopback.
    #[cfg(test)]
    let builder = builder.no_proxy();
    builder
        .build()
        .map_err(|source| ServiceError::transport(service, source))
}

/// Turn a non-success response into `ServiceError::Status`, keeping the body.
pub(crate) fn ensure_success(
    service: Service,
    response: Response,
) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    Err(ServiceError::Status {
        service,
        status: status.as_u16(),
        body: body.trim().to_string(),
    })
}

pub(crate) fn trim_base_url(url: &str) -> &str {
    url.trim_end_matches('/')
}
