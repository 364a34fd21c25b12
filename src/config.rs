use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RcPublishError, Result};
use crate::staleness::DEFAULT_STALE_THRESHOLD_DAYS;

/// Represents the complete file-backed configuration for rc-publish.
///
/// Everything here has a sensible default; the file only overrides. Secrets
/// never live in the file, they come from the environment (see [Inputs]).
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub repository: RepositoryConfig,

    #[serde(default)]
    pub release: ReleaseConfig,

    #[serde(default)]
    pub staleness: StalenessConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            repository: RepositoryConfig::default(),
            release: ReleaseConfig::default(),
            staleness: StalenessConfig::default(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

/// Repository coordinates and API endpoint.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RepositoryConfig {
    /// "owner/name" coordinate; falls back to `$GITHUB_REPOSITORY`
    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        RepositoryConfig {
            slug: None,
            api_base: default_api_base(),
        }
    }
}

fn default_rc_label() -> String {
    "RC".to_string()
}

/// Release-cut behavior.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReleaseConfig {
    /// Label that marks the tracking issue as a release candidate
    #[serde(default = "default_rc_label")]
    pub rc_label: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            rc_label: default_rc_label(),
        }
    }
}

fn default_threshold_days() -> i64 {
    DEFAULT_STALE_THRESHOLD_DAYS
}

/// Staleness-check behavior.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StalenessConfig {
    /// Days an RC issue may stay open before the reminder fires
    #[serde(default = "default_threshold_days")]
    pub threshold_days: i64,
}

impl Default for StalenessConfig {
    fn default() -> Self {
        StalenessConfig {
            threshold_days: default_threshold_days(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `rcpublish.toml` in current directory
/// 3. `.rcpublish.toml` in the user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./rcpublish.toml").exists() {
        fs::read_to_string("./rcpublish.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".rcpublish.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    toml::from_str(&config_str)
        .map_err(|e| RcPublishError::config(format!("invalid config file: {}", e)))
}

/// Repository coordinate split into owner and name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub repo: String,
}

impl RepoSlug {
    /// Parse an "owner/name" string
    pub fn parse(slug: &str) -> Result<Self> {
        match slug.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => Ok(RepoSlug {
                owner: owner.to_string(),
                repo: repo.to_string(),
            }),
            _ => Err(RcPublishError::config(format!(
                "repository coordinate \"{}\" is not of the form owner/name",
                slug
            ))),
        }
    }
}

/// Per-run inputs read from the environment.
///
/// Resolved before any network call; a missing required input fails the
/// run immediately.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub github_token: String,
    /// Elevated-privilege token for pushing the release branch, if any
    pub workflow_token: Option<String>,
    pub slack_webhook_url: String,
    pub repository: RepoSlug,
    /// Head commit from `$GITHUB_SHA`, overridable on the command line
    pub head_sha: Option<String>,
}

fn required_env(key: &str) -> Result<String> {
    env::var(key)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| RcPublishError::config(format!("required input \"{}\" was not defined", key)))
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}

impl Inputs {
    /// Resolve the run's inputs from the environment and config file.
    pub fn from_env(config: &Config) -> Result<Self> {
        let github_token = required_env("GITHUB_TOKEN")?;
        let workflow_token = optional_env("WORKFLOW_TOKEN");
        let slack_webhook_url = required_env("SLACK_WEBHOOK_URL")?;

        let slug = match &config.repository.slug {
            Some(slug) => slug.clone(),
            None => required_env("GITHUB_REPOSITORY")?,
        };
        let repository = RepoSlug::parse(&slug)?;

        Ok(Inputs {
            github_token,
            workflow_token,
            slack_webhook_url,
            repository,
            head_sha: optional_env("GITHUB_SHA"),
        })
    }
}
