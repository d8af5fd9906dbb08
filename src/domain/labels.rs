use serde::{Deserialize, Serialize};

fn default_ignore_labels() -> Vec<String> {
    vec!["changelog-ignore".to_string()]
}

fn default_patch_labels() -> Vec<String> {
    vec!["type: fix".to_string()]
}

fn default_minor_labels() -> Vec<String> {
    vec!["type: feature".to_string()]
}

fn default_major_labels() -> Vec<String> {
    vec!["breaking".to_string()]
}

fn default_ready_label() -> String {
    "release: ready".to_string()
}

fn default_done_label() -> String {
    "release: done".to_string()
}

/// Labels driving classification and the release pull request lifecycle.
///
/// `ignore`, `patch`, `minor` and `major` may overlap; evaluation order
/// (ignore, major, minor, patch) keeps the outcome deterministic.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ReleaseLabels {
    #[serde(default = "default_ignore_labels")]
    pub ignore: Vec<String>,

    #[serde(default = "default_patch_labels")]
    pub patch: Vec<String>,

    #[serde(default = "default_minor_labels")]
    pub minor: Vec<String>,

    #[serde(default = "default_major_labels")]
    pub major: Vec<String>,

    /// Marks the pending release pull request
    #[serde(default = "default_ready_label")]
    pub ready: String,

    /// Marks a release pull request that has been released
    #[serde(default = "default_done_label")]
    pub done: String,
}

impl ReleaseLabels {
    /// Whether `label` takes part in version classification
    pub fn is_classifying(&self, label: &str) -> bool {
        [&self.ignore, &self.patch, &self.minor, &self.major]
            .iter()
            .any(|set| set.iter().any(|name| name == label))
    }
}

impl Default for ReleaseLabels {
    fn default() -> Self {
        ReleaseLabels {
            ignore: default_ignore_labels(),
            patch: default_patch_labels(),
            minor: default_minor_labels(),
            major: default_major_labels(),
            ready: default_ready_label(),
            done: default_done_label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_labels() {
        let labels = ReleaseLabels::default();
        assert_eq!(labels.ready, "release: ready");
        assert_eq!(labels.done, "release: done");
        assert!(labels.is_classifying("breaking"));
        assert!(labels.is_classifying("changelog-ignore"));
        assert!(!labels.is_classifying("release: ready"));
    }
}
