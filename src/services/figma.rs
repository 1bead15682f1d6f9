//! Figma REST client.

use reqwest::blocking::Client;

use super::{Service, ServiceError, TreeSource, ensure_success, http_client, trim_base_url};
use crate::core::Node;
use crate::core::tree::DocumentFile;

pub const DEFAULT_FIGMA_API_URL: &str = "https://api.figma.com";

/// Depth requested for the document tree. Deep enough for any real file.
const TREE_DEPTH: &str = "100";

pub struct FigmaClient {
    http: Client,
    api_url: String,
    token: String,
    file_key: String,
}

impl FigmaClient {
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        file_key: impl Into<String>,
    ) -> Result<Self, ServiceError> {
        Ok(Self {
            http: http_client(Service::Figma)?,
            api_url: api_url.into(),
            token: token.into(),
            file_key: file_key.into(),
        })
    }

    fn file_url(&self) -> String {
        format!("{}/v1/files/{}", trim_base_url(&self.api_url), self.file_key)
    }
}

impl TreeSource for FigmaClient {
    fn fetch_tree(&self) -> Result<Node, ServiceError> {
        let url = self.file_url();
        tracing::debug!(%url, "fetching design document");

        let response = self
            .http
            .get(&url)
            .query(&[("depth", TREE_DEPTH)])
            .header("X-Figma-Token", &self.token)
            .send()
            .map_err(|source| ServiceError::transport(Service::Figma, source))?;
        let response = ensure_success(Service::Figma, response)?;

        let file: DocumentFile = response
            .json()
            .map_err(|e| ServiceError::decode(Service::Figma, e))?;
        Ok(file.document)
    }

    fn describe(&self) -> String {
        format!("Figma file {}", self.file_key)
    }
}
