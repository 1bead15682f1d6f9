//! Errors raised by external services.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// External collaborator that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Figma,
    GitHub,
    RemoteConfig,
    Gemini,
    LocalFile,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Figma => write!(f, "Figma"),
            Service::GitHub => write!(f, "GitHub"),
            Service::RemoteConfig => write!(f, "Firebase Remote Config"),
            Service::Gemini => write!(f, "Gemini"),
            Service::LocalFile => write!(f, "local file"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Network, DNS, TLS or timeout failure.
    #[error("{service}: request failed: {source}")]
    Transport {
        service: Service,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status.
    #[error("{service}: HTTP {status}: {body}")]
    Status {
        service: Service,
        status: u16,
        body: String,
    },

    /// Conditional write rejected because the target changed since it was read.
    #[error("{service}: write rejected, the target changed since it was read (HTTP {status})")]
    PreconditionFailed { service: Service, status: u16 },

    /// Response arrived but could not be understood.
    #[error("{service}: unexpected response: {message}")]
    Decode { service: Service, message: String },

    /// Credentials could not be used.
    #[error("{service}: authentication failed: {message}")]
    Auth { service: Service, message: String },

    #[error("{}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ServiceError {
    pub fn transport(service: Service, source: reqwest::Error) -> Self {
        ServiceError::Transport { service, source }
    }

    pub fn decode(service: Service, message: impl fmt::Display) -> Self {
        ServiceError::Decode {
            service,
            message: message.to_string(),
        }
    }

    pub fn auth(service: Service, message: impl fmt::Display) -> Self {
        ServiceError::Auth {
            service,
            message: message.to_string(),
        }
    }

    /// HTTP status of the failed call, if the service answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Status { status, .. }
            | ServiceError::PreconditionFailed { status, .. } => Some(*status),
            ServiceError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_precondition_failed(&self) -> bool {
        matches!(self, ServiceError::PreconditionFailed { .. })
    }

    /// The target does not exist: HTTP 404 or a missing local file.
    pub fn is_not_found(&self) -> bool {
        match self {
            ServiceError::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => self.status() == Some(404),
        }
    }
}
