use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fmt;

/// Lifecycle state of a pull request as reported by the hosting platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeState {
    Open,
    Closed,
}

impl fmt::Display for ChangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeState::Open => write!(f, "open"),
            ChangeState::Closed => write!(f, "closed"),
        }
    }
}

/// Which release pull request to look for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleasePullRequestState {
    Open,
    Merged,
}

impl fmt::Display for ReleasePullRequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleasePullRequestState::Open => write!(f, "open"),
            ReleasePullRequestState::Merged => write!(f, "merged"),
        }
    }
}

/// Snapshot of a pull request fetched for this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub number: u64,
    pub title: String,
    pub state: ChangeState,
    pub labels: BTreeSet<String>,
    pub merged_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub body: Option<String>,
    pub merge_commit_sha: Option<String>,
}

impl Change {
    /// Create a change with no labels, body or timestamps
    pub fn new(number: u64, title: impl Into<String>, state: ChangeState) -> Self {
        Change {
            number,
            title: title.into(),
            state,
            labels: BTreeSet::new(),
            merged_at: None,
            updated_at: None,
            body: None,
            merge_commit_sha: None,
        }
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn merged(mut self, at: DateTime<Utc>, merge_commit_sha: impl Into<String>) -> Self {
        self.merged_at = Some(at);
        self.merge_commit_sha = Some(merge_commit_sha.into());
        self
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    pub fn is_merged(&self) -> bool {
        self.merged_at.is_some()
    }

    /// Body text, treating a missing body as empty
    pub fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }
}
