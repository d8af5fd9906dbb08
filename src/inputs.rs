//! Per-run inputs supplied by the CI environment or the operator.

use crate::domain::{PreReleaseChannel, SemanticVersion};
use crate::error::{ReleaseError, Result};
use std::fmt;
use std::str::FromStr;

pub const MANUAL_TRIGGER_EVENT: &str = "workflow_dispatch";

/// `owner/repo` identifier of the hosted repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySlug {
    pub owner: String,
    pub repo: String,
}

impl RepositorySlug {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        RepositorySlug {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl FromStr for RepositorySlug {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                Ok(RepositorySlug::new(owner, repo))
            }
            _ => Err(ReleaseError::config(format!(
                "Invalid repository \"{}\": expected owner/repo",
                s
            ))),
        }
    }
}

impl fmt::Display for RepositorySlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Inputs describing the triggering event and any manual version request
#[derive(Debug, Clone, PartialEq)]
pub struct RunInputs {
    /// Commit the run was triggered on (production head)
    pub sha: String,
    pub actor: String,
    pub event_name: String,
    pub pre_release: Option<PreReleaseChannel>,
    pub release_as: Option<SemanticVersion>,
}

impl RunInputs {
    /// A version was explicitly requested by a human-triggered run
    pub fn is_manual_version(&self) -> bool {
        (self.pre_release.is_some() || self.release_as.is_some())
            && self.event_name == MANUAL_TRIGGER_EVENT
    }
}

/// Parse the `pre-release` input; empty means no channel
pub fn parse_pre_release(raw: &str) -> Result<Option<PreReleaseChannel>> {
    if raw.is_empty() {
        return Ok(None);
    }
    PreReleaseChannel::parse(raw).map(Some)
}

/// Parse the `release-as` input; empty means no explicit version
pub fn parse_release_as(raw: &str) -> Result<Option<SemanticVersion>> {
    if raw.is_empty() {
        return Ok(None);
    }
    SemanticVersion::parse(raw)
        .map(Some)
        .map_err(|_| ReleaseError::version(format!("Invalid version: \"{}\".", raw)))
}

/// Authentication is checked before any request is made
pub fn require_token(token: Option<&str>) -> Result<String> {
    match token.map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token.to_string()),
        _ => Err(ReleaseError::config(
            "Missing GITHUB_TOKEN: an API token is required",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(event: &str) -> RunInputs {
        RunInputs {
            sha: "abc".to_string(),
            actor: "octocat".to_string(),
            event_name: event.to_string(),
            pre_release: None,
            release_as: None,
        }
    }

    #[test]
    fn test_pre_release_input() {
        assert_eq!(
            parse_pre_release("alpha-01").unwrap().unwrap().as_str(),
            "alpha-01"
        );
        assert_eq!(parse_pre_release("").unwrap(), None);
        for value in ["te.st", "te_st", "te st", "test!"] {
            assert!(parse_pre_release(value).is_err(), "'{}' should fail", value);
        }
    }

    #[test]
    fn test_release_as_input() {
        assert_eq!(
            parse_release_as("1.2.3-alpha.4").unwrap().unwrap().to_string(),
            "1.2.3-alpha.4"
        );
        assert_eq!(parse_release_as("").unwrap(), None);
        assert!(parse_release_as("test").is_err());
    }

    #[test]
    fn test_manual_version_requires_dispatch() {
        let mut run = inputs("push");
        run.release_as = Some(SemanticVersion::new(2, 0, 0));
        assert!(!run.is_manual_version());

        run.event_name = MANUAL_TRIGGER_EVENT.to_string();
        assert!(run.is_manual_version());
    }

    #[test]
    fn test_dispatch_without_request_is_not_manual() {
        assert!(!inputs(MANUAL_TRIGGER_EVENT).is_manual_version());
    }

    #[test]
    fn test_repository_slug() {
        let slug: RepositorySlug = "octo/widgets".parse().unwrap();
        assert_eq!(slug, RepositorySlug::new("octo", "widgets"));
        assert_eq!(slug.to_string(), "octo/widgets");
        assert!("widgets".parse::<RepositorySlug>().is_err());
        assert!("a/b/c".parse::<RepositorySlug>().is_err());
    }

    #[test]
    fn test_require_token() {
        assert_eq!(require_token(Some("t0k3n")).unwrap(), "t0k3n");
        assert!(require_token(Some("  ")).is_err());
        assert!(require_token(None).is_err());
    }
}
