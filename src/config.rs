use std::{
    fmt, fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::{Context, Ok, Result, anyhow, bail};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::services::{
    RepoFile, figma::DEFAULT_FIGMA_API_URL, gemini, github::DEFAULT_GITHUB_API_URL,
    remote_config::DEFAULT_REMOTE_CONFIG_API_URL,
};

pub const CONFIG_FILE_NAME: &str = ".strsyncrc.json";

static IDENTIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub figma_file_key: String,
    #[serde(default = "default_figma_api_url")]
    pub figma_api_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<SnapshotConfig>,
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,
    #[serde(default = "default_commit_message")]
    pub commit_message: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_json_file_name")]
    pub json_file_name: String,
    #[serde(default = "default_localizable_file_name")]
    pub localizable_file_name: String,
    #[serde(default = "default_constants_file_name")]
    pub constants_file_name: String,
    #[serde(default = "default_constants_type_name")]
    pub constants_type_name: String,
    #[serde(default = "default_conflict_log_file")]
    pub conflict_log_file: String,
    #[serde(default = "default_remote_config_api_url")]
    pub remote_config_api_url: String,
    #[serde(default = "default_remote_config_parameter")]
    pub remote_config_parameter: String,
    #[serde(default = "default_correction_api_url")]
    pub correction_api_url: String,
    #[serde(default = "default_correction_model")]
    pub correction_model: String,
    #[serde(default = "default_correction_prompt")]
    pub correction_prompt: String,
}

/// Where the published snapshot lives in the code repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotConfig {
    pub owner: String,
    pub repo: String,
    #[serde(default = "default_snapshot_path")]
    pub path: String,
    #[serde(default = "default_snapshot_branch")]
    pub branch: String,
}

impl From<&SnapshotConfig> for RepoFile {
    fn from(snapshot: &SnapshotConfig) -> Self {
        RepoFile {
            owner: snapshot.owner.clone(),
            repo: snapshot.repo.clone(),
            path: snapshot.path.clone(),
            branch: snapshot.branch.clone(),
        }
    }
}

fn default_figma_api_url() -> String {
    DEFAULT_FIGMA_API_URL.to_string()
}

fn default_github_api_url() -> String {
    DEFAULT_GITHUB_API_URL.to_string()
}

fn default_commit_message() -> String {
    "chore: update strings.json".to_string()
}

fn default_output_dir() -> String {
    "./".to_string()
}

fn default_json_file_name() -> String {
    "strings.json".to_string()
}

fn default_localizable_file_name() -> String {
    "Localizable.strings".to_string()
}

fn default_constants_file_name() -> String {
    "Strings.swift".to_string()
}

fn default_constants_type_name() -> String {
    "Strings".to_string()
}

fn default_conflict_log_file() -> String {
    "string_conflicts.log".to_string()
}

fn default_remote_config_api_url() -> String {
    DEFAULT_REMOTE_CONFIG_API_URL.to_string()
}

fn default_remote_config_parameter() -> String {
    "strings".to_string()
}

fn default_correction_api_url() -> String {
    gemini::DEFAULT_GEMINI_API_URL.to_string()
}

fn default_correction_model() -> String {
    gemini::DEFAULT_MODEL.to_string()
}

fn default_correction_prompt() -> String {
    gemini::DEFAULT_PROMPT.to_string()
}

fn default_snapshot_path() -> String {
    "strings.json".to_string()
}

fn default_snapshot_branch() -> String {
    "main".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            figma_file_key: String::new(),
            figma_api_url: default_figma_api_url(),
            snapshot: None,
            github_api_url: default_github_api_url(),
            commit_message: default_commit_message(),
            output_dir: default_output_dir(),
            json_file_name: default_json_file_name(),
            localizable_file_name: default_localizable_file_name(),
            constants_file_name: default_constants_file_name(),
            constants_type_name: default_constants_type_name(),
            conflict_log_file: default_conflict_log_file(),
            remote_config_api_url: default_remote_config_api_url(),
            remote_config_parameter: default_remote_config_parameter(),
            correction_api_url: default_correction_api_url(),
            correction_model: default_correction_model(),
            correction_prompt: default_correction_prompt(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if !self.correction_prompt.contains(gemini::TEXT_PLACEHOLDER) {
            bail!(
                "'correctionPrompt' must contain the {} placeholder",
                gemini::TEXT_PLACEHOLDER
            );
        }

        if !IDENTIFIER_REGEX.is_match(&self.constants_type_name) {
            bail!(
                "'constantsTypeName' must be a valid identifier: \"{}\"",
                self.constants_type_name
            );
        }

        for (field, value) in [
            ("jsonFileName", &self.json_file_name),
            ("localizableFileName", &self.localizable_file_name),
            ("constantsFileName", &self.constants_file_name),
            ("remoteConfigParameter", &self.remote_config_parameter),
        ] {
            if value.trim().is_empty() {
                bail!("'{}' must not be empty", field);
            }
        }

        if let Some(snapshot) = &self.snapshot {
            for (field, value) in [
                ("snapshot.owner", &snapshot.owner),
                ("snapshot.repo", &snapshot.repo),
                ("snapshot.path", &snapshot.path),
                ("snapshot.branch", &snapshot.branch),
            ] {
                if value.trim().is_empty() {
                    bail!("'{}' must not be empty", field);
                }
            }
        }

        Ok(())
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.output_dir)
    }
}

/// Secrets enabling the external services.
///
/// Never read from the config file. Each missing value disables the
/// capability that needs it.
#[derive(Clone, Default)]
pub struct Credentials {
    pub figma_token: Option<String>,
    pub github_token: Option<String>,
    pub correction_api_key: Option<String>,
    /// Service-account key JSON for the remote-config service.
    pub remote_config_credentials: Option<String>,
}

impl Credentials {
    /// Drop blank values, so an exported-but-empty variable counts as absent.
    pub fn normalized(self) -> Self {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }
        Self {
            figma_token: present(self.figma_token),
            github_token: present(self.github_token),
            correction_api_key: present(self.correction_api_key),
            remote_config_credentials: present(self.remote_config_credentials),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(value: &Option<String>) -> &'static str {
            if value.is_some() { "<set>" } else { "<unset>" }
        }
        f.debug_struct("Credentials")
            .field("figma_token", &redact(&self.figma_token))
            .field("github_token", &redact(&self.github_token))
            .field("correction_api_key", &redact(&self.correction_api_key))
            .field(
                "remote_config_credentials",
                &redact(&self.remote_config_credentials),
            )
            .finish()
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path, e))?;
            config
                .validate()
                .map_err(|e| anyhow!("Invalid config file {:?}: {}", path, e))?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
