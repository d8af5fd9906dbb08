use crate::domain::{ReleaseLabels, TagPattern};
use crate::error::{ReleaseError, Result};
use crate::manifest::PACKAGE_FILE_NAME;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "release-pr.toml";

/// Represents the complete configuration for release-pr.
///
/// Contains branch names, release labels, release naming and behavior options.
/// The value is passed explicitly to every component that needs it.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub branches: BranchesConfig,

    #[serde(default)]
    pub labels: ReleaseLabels,

    #[serde(default)]
    pub release: ReleaseConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

fn default_production_branch() -> String {
    "main".to_string()
}

fn default_release_branch() -> String {
    "releases/next".to_string()
}

/// Branch pair used by the release pull request (release -> production).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BranchesConfig {
    #[serde(default = "default_production_branch")]
    pub production: String,

    #[serde(default = "default_release_branch")]
    pub release: String,
}

impl Default for BranchesConfig {
    fn default() -> Self {
        BranchesConfig {
            production: default_production_branch(),
            release: default_release_branch(),
        }
    }
}

fn default_tag_pattern() -> String {
    "v{version}".to_string()
}

fn default_manifest() -> String {
    PACKAGE_FILE_NAME.to_string()
}

/// Release naming and manifest location.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default = "default_tag_pattern")]
    pub tag_pattern: String,

    #[serde(default = "default_manifest")]
    pub manifest: String,
}

impl ReleaseConfig {
    pub fn tag_pattern(&self) -> Result<TagPattern> {
        TagPattern::new(self.tag_pattern.clone())
    }
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            tag_pattern: default_tag_pattern(),
            manifest: default_manifest(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Configuration for behavior customization.
///
/// Controls which side effects the prepare step is allowed to perform.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BehaviorConfig {
    /// Never open a release branch or pull request; only refresh an existing one
    #[serde(default)]
    pub skip_pull_request_creation: bool,

    /// Merge production into the release branch when a release pull request exists
    #[serde(default = "default_true")]
    pub keep_release_branch_updated: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        BehaviorConfig {
            skip_pull_request_creation: false,
            keep_release_branch_updated: true,
        }
    }
}

impl Config {
    /// Reject configurations that would break release naming.
    pub fn validate(&self) -> Result<()> {
        self.release.tag_pattern()?;

        if self.branches.production.is_empty() || self.branches.release.is_empty() {
            return Err(ReleaseError::config("Branch names must not be empty"));
        }
        if self.branches.production == self.branches.release {
            return Err(ReleaseError::config(format!(
                "Release branch must differ from production branch \"{}\"",
                self.branches.production
            )));
        }
        if self.labels.ready.is_empty() || self.labels.done.is_empty() {
            return Err(ReleaseError::config(
                "Release labels `ready` and `done` must not be empty",
            ));
        }

        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release-pr.toml` in current directory
/// 3. `release-pr.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        fs::read_to_string(CONFIG_FILE_NAME)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config =
        toml::from_str(&config_str).map_err(|e| ReleaseError::config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.branches.production, "main");
        assert_eq!(config.branches.release, "releases/next");
        assert!(config.behavior.keep_release_branch_updated);
        assert!(!config.behavior.skip_pull_request_creation);
    }

    #[test]
    fn test_partial_sections_use_defaults() {
        let config: Config = toml::from_str(
            r#"
[labels]
major = ["breaking", "semver: major"]

[behavior]
skip_pull_request_creation = true
"#,
        )
        .unwrap();

        assert_eq!(config.labels.major, vec!["breaking", "semver: major"]);
        assert_eq!(config.labels.patch, vec!["type: fix"]);
        assert!(config.behavior.skip_pull_request_creation);
        assert!(config.behavior.keep_release_branch_updated);
        assert_eq!(config.release.tag_pattern, "v{version}");
    }

    #[test]
    fn test_validate_rejects_same_branches() {
        let mut config = Config::default();
        config.branches.release = "main".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_tag_pattern_without_placeholder() {
        let mut config = Config::default();
        config.release.tag_pattern = "latest".to_string();
        assert!(config.validate().is_err());
    }
}
