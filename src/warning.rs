use crate::domain::ReleasePullRequestState;
use std::fmt;

/// Non-fatal conditions met while resolving the release state.
/// These are reported to the user as warnings and never abort the run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunWarning {
    /// Several labelled release pull requests matched; the last updated one was used
    MultipleReleasePullRequests { state: ReleasePullRequestState },
    /// An open release pull request was found by title without its ready label
    ReleasePullRequestRecovered { number: u64, label: String },
}

impl RunWarning {
    /// Short title shown next to the warning in CI annotations
    pub fn title(&self) -> &'static str {
        match self {
            RunWarning::MultipleReleasePullRequests { .. } => "Multiple Release PR",
            RunWarning::ReleasePullRequestRecovered { .. } => "Release PR Recovered",
        }
    }
}

impl fmt::Display for RunWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunWarning::MultipleReleasePullRequests { state } => write!(
                f,
                "More than one {} release pull request found. Using the last updated.",
                state
            ),
            RunWarning::ReleasePullRequestRecovered { number, label } => write!(
                f,
                "Release pull request #{} has no \"{}\" label. It will be labelled again.",
                number, label
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiple_release_pull_requests_display() {
        let warning = RunWarning::MultipleReleasePullRequests {
            state: ReleasePullRequestState::Merged,
        };
        assert_eq!(
            warning.to_string(),
            "More than one merged release pull request found. Using the last updated."
        );
        assert_eq!(warning.title(), "Multiple Release PR");
    }

    #[test]
    fn test_recovered_display() {
        let warning = RunWarning::ReleasePullRequestRecovered {
            number: 12,
            label: "release: ready".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "Release pull request #12 has no \"release: ready\" label. It will be labelled again."
        );
    }
}
