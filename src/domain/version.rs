use crate::domain::prerelease::PreReleaseChannel;
use crate::error::{ReleaseError, Result};
use std::fmt;
use std::str::FromStr;

/// Immutable semantic version.
///
/// Every increment produces a new value. Build metadata is accepted when
/// parsing but never rendered and is dropped by increments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SemanticVersion(semver::Version);

/// Increment operations supported by [`SemanticVersion::increment`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Increment<'a> {
    Major,
    Minor,
    Patch,
    PreMajor(&'a PreReleaseChannel),
    PreMinor(&'a PreReleaseChannel),
    PrePatch(&'a PreReleaseChannel),
    PreRelease(&'a PreReleaseChannel),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Identifier {
    Numeric(u64),
    Alpha(String),
}

impl Identifier {
    fn parse(raw: &str) -> Self {
        match raw.parse::<u64>() {
            Ok(n) if raw.chars().all(|c| c.is_ascii_digit()) => Identifier::Numeric(n),
            _ => Identifier::Alpha(raw.to_string()),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{}", n),
            Identifier::Alpha(s) => write!(f, "{}", s),
        }
    }
}

impl SemanticVersion {
    /// Create a release version without pre-release identifiers
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion(semver::Version::new(major, minor, patch))
    }

    /// Baseline used when a package has never been released
    pub fn initial() -> Self {
        Self::new(0, 0, 0)
    }

    /// Parse a version string, accepting an optional `v` prefix
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let clean = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        semver::Version::parse(clean)
            .map(SemanticVersion)
            .map_err(|e| ReleaseError::version(format!("Invalid version: \"{}\" ({}).", raw, e)))
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn patch(&self) -> u64 {
        self.0.patch
    }

    /// Pre-release identifiers in order (empty for a release version)
    pub fn prerelease(&self) -> Vec<String> {
        self.identifiers().iter().map(ToString::to_string).collect()
    }

    /// First pre-release identifier, e.g. `beta` for `1.0.0-beta.2`
    pub fn prerelease_channel(&self) -> Option<String> {
        self.prerelease().into_iter().next()
    }

    pub fn is_prerelease(&self) -> bool {
        !self.0.pre.is_empty()
    }

    /// Whether the version is past the initial development phase (major >= 1)
    pub fn is_stable(&self) -> bool {
        self.0.major > 0
    }

    /// Return the incremented version.
    ///
    /// Plain increments always bump their component, reset lower components and
    /// clear the pre-release suffix. `Pre*` increments bump the component and open
    /// a `<channel>.0` sequence. `PreRelease` only advances the counter of an
    /// existing sequence; it opens a new one (on the next patch for a release
    /// version) when the channel changes.
    pub fn increment(&self, increment: Increment<'_>) -> Result<Self> {
        let mut major = self.0.major;
        let mut minor = self.0.minor;
        let mut patch = self.0.patch;
        let mut identifiers = self.identifiers();

        match increment {
            Increment::Major | Increment::PreMajor(_) => {
                major += 1;
                minor = 0;
                patch = 0;
                identifiers.clear();
            }
            Increment::Minor | Increment::PreMinor(_) => {
                minor += 1;
                patch = 0;
                identifiers.clear();
            }
            Increment::Patch | Increment::PrePatch(_) => {
                patch += 1;
                identifiers.clear();
            }
            Increment::PreRelease(_) => {
                if identifiers.is_empty() {
                    patch += 1;
                }
            }
        }

        match increment {
            Increment::PreMajor(channel)
            | Increment::PreMinor(channel)
            | Increment::PrePatch(channel)
            | Increment::PreRelease(channel) => advance_prerelease(&mut identifiers, channel),
            Increment::Major | Increment::Minor | Increment::Patch => {}
        }

        let mut next = semver::Version::new(major, minor, patch);
        if !identifiers.is_empty() {
            let joined = identifiers
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(".");
            next.pre = semver::Prerelease::new(&joined).map_err(|e| {
                ReleaseError::version(format!("Invalid pre-release \"{}\" ({}).", joined, e))
            })?;
        }

        Ok(SemanticVersion(next))
    }

    fn identifiers(&self) -> Vec<Identifier> {
        if self.0.pre.is_empty() {
            return Vec::new();
        }
        self.0.pre.as_str().split('.').map(Identifier::parse).collect()
    }
}

/// Advances (or opens) a pre-release sequence tagged with `channel`.
fn advance_prerelease(identifiers: &mut Vec<Identifier>, channel: &PreReleaseChannel) {
    if identifiers.is_empty() {
        identifiers.push(Identifier::Numeric(0));
    } else if let Some(counter) = identifiers
        .iter_mut()
        .rev()
        .find_map(|id| match id {
            Identifier::Numeric(n) => Some(n),
            Identifier::Alpha(_) => None,
        })
    {
        *counter += 1;
    } else {
        identifiers.push(Identifier::Numeric(0));
    }

    let fresh = vec![
        Identifier::Alpha(channel.as_str().to_string()),
        Identifier::Numeric(0),
    ];
    let same_channel = identifiers[0].to_string() == channel.as_str();
    let has_counter = matches!(identifiers.get(1), Some(Identifier::Numeric(_)));
    if !same_channel || !has_counter {
        *identifiers = fresh;
    }
}

impl FromStr for SemanticVersion {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        SemanticVersion::parse(s)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.0.major, self.0.minor, self.0.patch)?;
        if !self.0.pre.is_empty() {
            write!(f, "-{}", self.0.pre)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(raw: &str) -> SemanticVersion {
        SemanticVersion::parse(raw).unwrap()
    }

    fn beta() -> PreReleaseChannel {
        PreReleaseChannel::parse("beta").unwrap()
    }

    #[test]
    fn test_version_parse() {
        let version = v("1.2.3-alpha.4");
        assert_eq!(version.major(), 1);
        assert_eq!(version.minor(), 2);
        assert_eq!(version.patch(), 3);
        assert_eq!(version.prerelease(), vec!["alpha", "4"]);
        assert_eq!(version.prerelease_channel(), Some("alpha".to_string()));
    }

    #[test]
    fn test_version_parse_with_prefix() {
        assert_eq!(v("v1.2.3"), SemanticVersion::new(1, 2, 3));
    }

    #[test]
    fn test_version_parse_invalid() {
        assert!(SemanticVersion::parse("1.2").is_err());
        assert!(SemanticVersion::parse("test").is_err());
        assert!(SemanticVersion::parse("1.2.3.4").is_err());
    }

    #[test]
    fn test_version_display_drops_build_metadata() {
        assert_eq!(v("1.2.3-rc.1+build.5").to_string(), "1.2.3-rc.1");
    }

    #[test]
    fn test_version_bump_major() {
        let bumped = v("1.2.3").increment(Increment::Major).unwrap();
        assert_eq!(bumped.to_string(), "2.0.0");
    }

    #[test]
    fn test_version_bump_minor() {
        let bumped = v("1.2.3").increment(Increment::Minor).unwrap();
        assert_eq!(bumped.to_string(), "1.3.0");
    }

    #[test]
    fn test_version_bump_patch_clears_prerelease() {
        let bumped = v("1.2.3-alpha.4").increment(Increment::Patch).unwrap();
        assert_eq!(bumped.to_string(), "1.2.4");
    }

    #[test]
    fn test_version_premajor() {
        let bumped = v("1.2.3").increment(Increment::PreMajor(&beta())).unwrap();
        assert_eq!(bumped.to_string(), "2.0.0-beta.0");
    }

    #[test]
    fn test_version_preminor() {
        let bumped = v("1.2.3").increment(Increment::PreMinor(&beta())).unwrap();
        assert_eq!(bumped.to_string(), "1.3.0-beta.0");
    }

    #[test]
    fn test_version_prepatch() {
        let bumped = v("1.2.3-beta.4").increment(Increment::PrePatch(&beta())).unwrap();
        assert_eq!(bumped.to_string(), "1.2.4-beta.0");
    }

    #[test]
    fn test_version_prerelease_from_release() {
        let bumped = v("1.2.3").increment(Increment::PreRelease(&beta())).unwrap();
        assert_eq!(bumped.to_string(), "1.2.4-beta.0");
    }

    #[test]
    fn test_version_prerelease_same_channel() {
        let bumped = v("1.2.4-beta.0").increment(Increment::PreRelease(&beta())).unwrap();
        assert_eq!(bumped.to_string(), "1.2.4-beta.1");
    }

    #[test]
    fn test_version_prerelease_switches_channel() {
        let bumped = v("1.2.4-alpha.3").increment(Increment::PreRelease(&beta())).unwrap();
        assert_eq!(bumped.to_string(), "1.2.4-beta.0");
    }

    #[test]
    fn test_version_prerelease_without_counter() {
        let bumped = v("1.2.4-beta").increment(Increment::PreRelease(&beta())).unwrap();
        assert_eq!(bumped.to_string(), "1.2.4-beta.0");
    }

    #[test]
    fn test_version_is_stable() {
        assert!(v("1.0.0").is_stable());
        assert!(!v("0.10.0").is_stable());
    }

    #[test]
    fn test_version_ordering() {
        assert!(v("1.2.4-beta.1") > v("1.2.4-beta.0"));
        assert!(v("1.2.4") > v("1.2.4-beta.9"));
    }
}
