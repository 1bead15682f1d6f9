//! GitHub contents API: snapshot read and conditional write.
//!
//! Writes carry the blob `sha` observed by the last `load`, so a commit made
//! between reading the baseline and publishing makes GitHub reject the write
//! instead of silently losing it.

use std::cell::RefCell;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use super::{
    Service, ServiceError, SnapshotStore, ensure_success, http_client, trim_base_url,
};
use crate::core::SnapshotTable;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Location of the snapshot file in a repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RepoFile {
    pub owner: String,
    pub repo: String,
    pub path: String,
    pub branch: String,
}

impl std::fmt::Display for RepoFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}:{}@{}", self.owner, self.repo, self.path, self.branch)
    }
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct UpdateResponse {
    content: Option<ContentsResponse>,
}

/// Version of the file seen on the branch.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Observed {
    Missing,
    Blob(String),
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

pub struct GithubContents {
    http: Client,
    api_url: String,
    token: String,
    file: RepoFile,
    commit_message: String,
    observed: RefCell<Option<Observed>>,
}

impl GithubContents {
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        file: RepoFile,
        commit_message: impl Into<String>,
    ) -> Result<Self, ServiceError> {
        Ok(Self {
            http: http_client(Service::GitHub)?,
            api_url: api_url.into(),
            token: token.into(),
            file,
            commit_message: commit_message.into(),
            observed: RefCell::new(None),
        })
    }

    fn contents_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            trim_base_url(&self.api_url),
            self.file.owner,
            self.file.repo,
            self.file.path.trim_start_matches('/')
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github.v3+json")
    }

    /// Current file on the branch, `None` when it does not exist yet.
    fn fetch(&self) -> Result<Option<ContentsResponse>, ServiceError> {
        let url = self.contents_url();
        tracing::debug!(%url, branch = %self.file.branch, "reading repository file");

        let response = self
            .authorized(self.http.get(&url))
            .header("Cache-Control", "no-cache")
            .query(&[("ref", self.file.branch.as_str())])
            .send()
            .map_err(|source| ServiceError::transport(Service::GitHub, source))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = ensure_success(Service::GitHub, response)?;
        response
            .json()
            .map(Some)
            .map_err(|e| ServiceError::decode(Service::GitHub, e))
    }
}

impl SnapshotStore for GithubContents {
    /// Read the baseline and remember its version for the next `store`.
    fn load(&self) -> Result<SnapshotTable, ServiceError> {
        let Some(file) = self.fetch()? else {
            *self.observed.borrow_mut() = Some(Observed::Missing);
            return Err(ServiceError::Status {
                service: Service::GitHub,
                status: StatusCode::NOT_FOUND.as_u16(),
                body: format!("{} not found", self.file),
            });
        };
        *self.observed.borrow_mut() = Some(Observed::Blob(file.sha.clone()));
        let text = decode_content(&file.content)?;
        SnapshotTable::parse(&text).map_err(|e| ServiceError::decode(Service::GitHub, e))
    }

    /// Write conditionally on the version seen by `load`. Without a prior
    /// `load` the current version is looked up first.
    fn store(&self, contents: &str) -> Result<(), ServiceError> {
        let observed = self.observed.borrow().clone();
        let sha = match observed {
            Some(Observed::Blob(sha)) => Some(sha),
            Some(Observed::Missing) => None,
            None => self.fetch()?.map(|file| file.sha),
        };
        tracing::debug!(has_sha = sha.is_some(), "writing repository file");

        let request = UpdateRequest {
            message: &self.commit_message,
            content: STANDARD.encode(contents.as_bytes()),
            branch: &self.file.branch,
            sha,
        };

        let response = self
            .authorized(self.http.put(self.contents_url()))
            .json(&request)
            .send()
            .map_err(|source| ServiceError::transport(Service::GitHub, source))?;

        let status = response.status();
        if status == StatusCode::CONFLICT || status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(ServiceError::PreconditionFailed {
                service: Service::GitHub,
                status: status.as_u16(),
            });
        }
        let response = ensure_success(Service::GitHub, response)?;

        // The next write is conditional on this commit.
        let written = response
            .json::<UpdateResponse>()
            .ok()
            .and_then(|update| update.content)
            .map(|file| Observed::Blob(file.sha));
        *self.observed.borrow_mut() = written;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("GitHub {}", self.file)
    }
}

/// Decode the base64 `content` field. GitHub wraps it at 60 columns.
fn decode_content(content: &str) -> Result<String, ServiceError> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact).map_err(|e| {
        ServiceError::decode(Service::GitHub, format!("invalid base64 content: {e}"))
    })?;
    String::from_utf8(bytes).map_err(|e| {
        ServiceError::decode(Service::GitHub, format!("content is not UTF-8: {e}"))
    })
}
