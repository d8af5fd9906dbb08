use crate::domain::version::SemanticVersion;
use crate::error::{ReleaseError, Result};

const VERSION_PLACEHOLDER: &str = "{version}";

/// Release tag naming pattern (e.g., "v{version}", "release-{version}")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPattern {
    pattern: String,
}

impl TagPattern {
    /// Create a tag pattern, requiring exactly one `{version}` placeholder
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if pattern.matches(VERSION_PLACEHOLDER).count() != 1 {
            return Err(ReleaseError::config(format!(
                "Tag pattern \"{}\" must contain exactly one {{version}} placeholder",
                pattern
            )));
        }

        Ok(TagPattern { pattern })
    }

    /// Format a version according to pattern
    /// Example: pattern="v{version}", version="1.2.3" -> "v1.2.3"
    pub fn format(&self, version: &SemanticVersion) -> String {
        self.pattern
            .replace(VERSION_PLACEHOLDER, &version.to_string())
    }

    /// Check whether a tag was produced by this pattern
    pub fn matches(&self, tag: &str) -> bool {
        let escaped = regex::escape(&self.pattern);
        let regex_pattern = escaped.replace(r"\{version\}", r"(\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?)");

        regex::Regex::new(&format!("^{}$", regex_pattern))
            .map(|re| re.is_match(tag))
            .unwrap_or(false)
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

impl Default for TagPattern {
    fn default() -> Self {
        TagPattern {
            pattern: "v{version}".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_format() {
        let pattern = TagPattern::default();
        let version = SemanticVersion::parse("1.2.3").unwrap();
        assert_eq!(pattern.format(&version), "v1.2.3");
    }

    #[test]
    fn test_pattern_format_with_prerelease() {
        let pattern = TagPattern::new("release-{version}").unwrap();
        let version = SemanticVersion::parse("2.0.0-beta.1").unwrap();
        assert_eq!(pattern.format(&version), "release-2.0.0-beta.1");
    }

    #[test]
    fn test_pattern_requires_placeholder() {
        assert!(TagPattern::new("latest").is_err());
        assert!(TagPattern::new("{version}-{version}").is_err());
    }

    #[test]
    fn test_pattern_matches() {
        let pattern = TagPattern::default();
        assert!(pattern.matches("v1.2.3"));
        assert!(pattern.matches("v1.2.3-rc.1"));
        assert!(!pattern.matches("release-1.2.3"));
    }
}
