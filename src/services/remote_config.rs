//! Firebase Remote Config publisher.
//!
//! Authenticates with a Google service-account key (JWT bearer grant) and
//! overwrites one string parameter with the whole serialized mapping. The
//! write is unconditional (`If-Match: *`).

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{RemoteConfigSink, Service, ServiceError, ensure_success, http_client, trim_base_url};

pub const DEFAULT_REMOTE_CONFIG_API_URL: &str = "https://firebaseremoteconfig.googleapis.com";

pub const REMOTE_CONFIG_SCOPE: &str = "https://www.googleapis.com/auth/firebase.remoteconfig";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: u64 = 3600;

/// The fields of a Google service-account JSON key that the exchange needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub project_id: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self, ServiceError> {
        serde_json::from_str(json).map_err(|e| {
            ServiceError::auth(Service::RemoteConfig, format!("invalid service-account key: {e}"))
        })
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct FirebaseRemoteConfig {
    http: Client,
    api_url: String,
    key: ServiceAccountKey,
    parameter: String,
}

impl FirebaseRemoteConfig {
    pub fn new(
        api_url: impl Into<String>,
        key: ServiceAccountKey,
        parameter: impl Into<String>,
    ) -> Result<Self, ServiceError> {
        Ok(Self {
            http: http_client(Service::RemoteConfig)?,
            api_url: api_url.into(),
            key,
            parameter: parameter.into(),
        })
    }

    fn template_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/remoteConfig",
            trim_base_url(&self.api_url),
            self.key.project_id
        )
    }

    fn access_token(&self) -> Result<String, ServiceError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ServiceError::auth(Service::RemoteConfig, e))?
            .as_secs();
        let assertion = sign_assertion(&self.key, now)?;

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .map_err(|source| ServiceError::transport(Service::RemoteConfig, source))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ServiceError::auth(
                Service::RemoteConfig,
                format!("token exchange returned HTTP {}: {}", status.as_u16(), body.trim()),
            ));
        }

        let token: TokenResponse = response
            .json()
            .map_err(|e| ServiceError::decode(Service::RemoteConfig, e))?;
        Ok(token.access_token)
    }
}

impl RemoteConfigSink for FirebaseRemoteConfig {
    fn publish(&self, serialized: &str) -> Result<(), ServiceError> {
        let token = self.access_token()?;
        let url = self.template_url();
        tracing::debug!(%url, parameter = %self.parameter, "updating remote config");

        let response = self
            .http
            .put(&url)
            .bearer_auth(token)
            .header("Content-Type", "application/json; UTF-8")
            .header("If-Match", "*")
            .body(remote_config_payload(&self.parameter, serialized).to_string())
            .send()
            .map_err(|source| ServiceError::transport(Service::RemoteConfig, source))?;
        ensure_success(Service::RemoteConfig, response)?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "Firebase Remote Config {} (parameter `{}`)",
            self.key.project_id, self.parameter
        )
    }
}

/// Template body that stores `serialized` as the default value of `parameter`.
pub fn remote_config_payload(parameter: &str, serialized: &str) -> Value {
    json!({
        "parameters": {
            parameter: {
                "defaultValue": {
                    "value": serialized
                }
            }
        }
    })
}

fn sign_assertion(key: &ServiceAccountKey, now: u64) -> Result<String, ServiceError> {
    let claims = AssertionClaims {
        iss: &key.client_email,
        scope: REMOTE_CONFIG_SCOPE,
        aud: &key.token_uri,
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    };
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
        ServiceError::auth(Service::RemoteConfig, format!("invalid private key: {e}"))
    })?;
    jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
        .map_err(|e| ServiceError::auth(Service::RemoteConfig, e))
}
