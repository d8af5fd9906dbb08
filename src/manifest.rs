//! Version manifest access (`package.json`)
//!
//! The manifest is the single source of truth for the package name and its
//! current version. Writing never touches the file on disk: the updated content
//! is returned base64-encoded, ready to be committed to the release branch.

use crate::domain::SemanticVersion;
use crate::error::{try_execute, ReleaseError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use regex::Regex;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const PACKAGE_FILE_NAME: &str = "package.json";

const PACKAGE_NAME_PATTERN: &str = r"^(@[a-zA-Z0-9_-]+/)?[a-zA-Z0-9_-]+$";

/// Package identity and version read from the manifest
#[derive(Debug, Clone, PartialEq)]
pub struct PackageInfo {
    /// Package name without its scope (`@org/app` -> `app`)
    pub name: String,
    /// `None` when the package has never been released
    pub version: Option<SemanticVersion>,
}

/// Read/write access to the version manifest
pub trait VersionManifest {
    /// Path of the manifest relative to the repository root
    fn repository_path(&self) -> &str;

    /// Read package name and current version
    fn read(&self) -> Result<PackageInfo>;

    /// Manifest content with `version` replaced, base64-encoded
    fn encoded_with_version(&self, version: &SemanticVersion) -> Result<String>;
}

/// `package.json` manifest on the local file system
#[derive(Debug, Clone)]
pub struct PackageJsonManifest {
    path: PathBuf,
    repository_path: String,
}

impl PackageJsonManifest {
    /// Manifest at `path`, committed under the same relative path
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let repository_path = path.to_string_lossy().trim_start_matches("./").to_string();
        PackageJsonManifest {
            path,
            repository_path,
        }
    }

    /// Override the path used when committing to the hosting platform
    pub fn with_repository_path(mut self, repository_path: impl Into<String>) -> Self {
        self.repository_path = repository_path.into();
        self
    }

    fn load(&self) -> Result<Map<String, Value>> {
        let content = fs::read_to_string(&self.path)?;
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(ReleaseError::manifest(format!(
                "{} must contain a JSON object.",
                self.repository_path
            ))),
        }
    }
}

impl VersionManifest for PackageJsonManifest {
    fn repository_path(&self) -> &str {
        &self.repository_path
    }

    fn read(&self) -> Result<PackageInfo> {
        try_execute(format!("Error while reading {}.", self.repository_path), || {
            log::debug!("Reading {}...", self.path.display());
            let content = self.load()?;
            let info = parse_package(&content)?;
            log::debug!(
                "name=\"{}\"; version={}.",
                info.name,
                info.version
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "none".to_string())
            );
            log::info!("{} read.", self.repository_path);

            Ok(info)
        })
    }

    fn encoded_with_version(&self, version: &SemanticVersion) -> Result<String> {
        try_execute(
            format!(
                "Error while creating new {} encoded content.",
                self.repository_path
            ),
            || {
                log::debug!("Creating new {} encoded content...", self.repository_path);
                let content = self.load()?;
                let rendered = render_with_version(content, version)?;
                log::info!("{} updated.", self.repository_path);

                Ok(STANDARD.encode(rendered))
            },
        )
    }
}

/// Validate the manifest fields the release flow depends on
pub fn parse_package(content: &Map<String, Value>) -> Result<PackageInfo> {
    let raw_name = content
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| ReleaseError::manifest("Missing package name."))?;
    let name = package_name(raw_name)?;

    let version = match content.get("version") {
        None | Some(Value::Null) => None,
        Some(Value::String(raw)) if raw.is_empty() => None,
        Some(Value::String(raw)) => Some(SemanticVersion::parse(raw).map_err(|_| {
            ReleaseError::manifest(format!("Invalid package version: \"{}\".", raw))
        })?),
        Some(other) => {
            return Err(ReleaseError::manifest(format!(
                "Invalid package version: {}.",
                other
            )))
        }
    };

    Ok(PackageInfo { name, version })
}

/// Strip the scope from a package name after validating it
pub fn package_name(raw: &str) -> Result<String> {
    let re = Regex::new(PACKAGE_NAME_PATTERN)
        .map_err(|e| ReleaseError::manifest(format!("Invalid name pattern: {}", e)))?;
    if !re.is_match(raw) {
        return Err(ReleaseError::manifest(format!(
            "Invalid package name: \"{}\".",
            raw
        )));
    }

    let name = raw.rsplit('/').next().unwrap_or(raw);
    if name.is_empty() {
        return Err(ReleaseError::manifest(format!(
            "Invalid package name: \"{}\".",
            raw
        )));
    }

    Ok(name.to_string())
}

/// Pretty-print the manifest with `version` placed right after `name`.
///
/// All other fields keep their original relative order.
pub fn render_with_version(content: Map<String, Value>, version: &SemanticVersion) -> Result<String> {
    let mut ordered = Map::new();
    ordered.insert(
        "name".to_string(),
        content.get("name").cloned().unwrap_or(Value::Null),
    );
    ordered.insert("version".to_string(), Value::String(version.to_string()));
    for (key, value) in content {
        if key != "name" && key != "version" {
            ordered.insert(key, value);
        }
    }

    let mut rendered = serde_json::to_string_pretty(&Value::Object(ordered))?;
    rendered.push('\n');
    Ok(rendered)
}
