pub mod card;
pub mod context;
pub mod delivery;
pub mod error;
pub mod git;
pub mod logging;
pub mod notify;

use serde::Deserialize;
use std::fs;

use crate::card::NotificationStatus;
use crate::error::{NotifyError, Result};
use crate::git::DiffBase;

/// Optional TOML configuration layer. Environment inputs take precedence
/// over anything read from the file.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FileConfig {
    pub status: Option<String>,
    pub teams_webhook: Option<String>,
    pub last_sha: Option<String>,
}

/// Fully resolved notifier configuration.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    pub status: NotificationStatus,
    pub webhook_url: String,
    pub diff_base: DiffBase,
}

impl NotifyConfig {
    /// Resolve configuration from a key/value source layered over an
    /// optional file config. Empty-string inputs count as absent; an
    /// absent `last_sha` selects the single-commit diff.
    pub fn resolve(file: FileConfig, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let status_raw = lookup("INPUT_STATUS")
            .and_then(non_empty)
            .or(file.status)
            .ok_or_else(|| NotifyError::ConfigError("Missing required input 'status'".into()))?;
        let status: NotificationStatus = status_raw.parse()?;

        let webhook_url = lookup("INPUT_TEAMS_WEBHOOK")
            .and_then(non_empty)
            .or(file.teams_webhook)
            .ok_or_else(|| {
                NotifyError::ConfigError("Missing required input 'teams_webhook'".into())
            })?;

        let diff_base = match lookup("INPUT_LAST_SHA")
            .and_then(non_empty)
            .or(file.last_sha.and_then(non_empty))
        {
            Some(sha) => DiffBase::Since(sha),
            None => DiffBase::CurrentCommit,
        };

        Ok(Self {
            status,
            webhook_url,
            diff_base,
        })
    }

    /// Resolve from the process environment, reading the file named by
    /// `NOTIFY_CONFIG` first when set.
    pub fn from_env() -> Result<Self> {
        let file = match std::env::var("NOTIFY_CONFIG") {
            Ok(path) if !path.is_empty() => load_file_config(&path)?,
            _ => FileConfig::default(),
        };
        Self::resolve(file, |key| std::env::var(key).ok())
    }
}

/// Load and parse the configuration file
pub fn load_file_config(path: &str) -> Result<FileConfig> {
    let config_str = fs::read_to_string(path).map_err(|e| {
        NotifyError::ConfigError(format!("Failed to read config file '{}': {}", path, e))
    })?;

    let config: FileConfig = toml::from_str(&config_str).map_err(|e| {
        NotifyError::ConfigError(format!("Failed to parse config file '{}': {}", path, e))
    })?;

    Ok(config)
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolve(vars: &[(&str, &str)]) -> Result<NotifyConfig> {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        NotifyConfig::resolve(FileConfig::default(), |key| {
            map.get(key).map(|v| v.to_string())
        })
    }

    #[test]
    fn resolves_required_inputs() {
        let config = resolve(&[
            ("INPUT_STATUS", "success"),
            ("INPUT_TEAMS_WEBHOOK", "https://hooks.example.com/abc"),
        ])
        .unwrap();
        assert_eq!(config.status, NotificationStatus::Success);
        assert_eq!(config.webhook_url, "https://hooks.example.com/abc");
        assert_eq!(config.diff_base, DiffBase::CurrentCommit);
    }

    #[test]
    fn last_sha_selects_the_two_revision_diff() {
        let config = resolve(&[
            ("INPUT_STATUS", "failure"),
            ("INPUT_TEAMS_WEBHOOK", "https://hooks.example.com/abc"),
            ("INPUT_LAST_SHA", "deadbeef"),
        ])
        .unwrap();
        assert_eq!(config.diff_base, DiffBase::Since("deadbeef".to_string()));
    }

    #[test]
    fn empty_last_sha_counts_as_absent() {
        let config = resolve(&[
            ("INPUT_STATUS", "success"),
            ("INPUT_TEAMS_WEBHOOK", "https://hooks.example.com/abc"),
            ("INPUT_LAST_SHA", ""),
        ])
        .unwrap();
        assert_eq!(config.diff_base, DiffBase::CurrentCommit);
    }

    #[test]
    fn invalid_status_fails_fast() {
        let err = resolve(&[
            ("INPUT_STATUS", "invalid-value"),
            ("INPUT_TEAMS_WEBHOOK", "https://hooks.example.com/abc"),
        ])
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid job status: invalid-value");
    }

    #[test]
    fn missing_webhook_is_a_config_error() {
        let err = resolve(&[("INPUT_STATUS", "success")]).unwrap_err();
        assert!(err.to_string().contains("teams_webhook"));
    }

    #[test]
    fn environment_overrides_file_values() {
        let file = FileConfig {
            status: Some("failure".to_string()),
            teams_webhook: Some("https://hooks.example.com/file".to_string()),
            last_sha: None,
        };
        let config = NotifyConfig::resolve(file, |key| match key {
            "INPUT_STATUS" => Some("success".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.status, NotificationStatus::Success);
        assert_eq!(config.webhook_url, "https://hooks.example.com/file");
    }

    #[test]
    fn file_config_parses_from_toml() {
        let config: FileConfig =
            toml::from_str("status = \"warning\"\nteams_webhook = \"https://h.example.com/w\"\n")
                .unwrap();
        assert_eq!(config.status.as_deref(), Some("warning"));
        assert_eq!(config.last_sha, None);
    }
}
