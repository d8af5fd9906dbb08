//! Hosting platform abstraction layer
//!
//! The release flow never talks to the platform directly. It goes through the
//! [`ReleaseHost`] trait, which has two implementations:
//!
//! - [github::GitHubHost]: the GitHub REST API over `ureq`
//! - [mock::MockHost]: an in-memory host that records every call, for tests
//!
//! [`ReleaseRepository`] sits on top of the trait and exposes the operations
//! the release flow needs, with stable error messages and logging.

pub mod github;
pub mod mock;
pub mod release_repository;

pub use github::GitHubHost;
pub use mock::{HostCall, MockHost};
pub use release_repository::{BranchStatus, ChangesSinceRelease, ReleaseRepository};

use crate::domain::{Change, ChangeState};
use crate::error::Result;

/// Branch head as reported by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    pub sha: String,
}

/// Annotated tag object created for a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub tag: String,
    pub sha: String,
}

/// Published release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedRelease {
    pub name: String,
    pub html_url: String,
}

/// Pull request to open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPullRequest {
    pub title: String,
    pub head: String,
    pub base: String,
    pub body: String,
}

/// Single-file commit on a branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCommit {
    pub path: String,
    pub branch: String,
    pub message: String,
    /// Base64-encoded content
    pub content: String,
    /// Blob SHA of the file being replaced
    pub sha: String,
}

/// Release to publish from an existing tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRelease {
    pub tag_name: String,
    pub name: String,
    pub prerelease: bool,
}

/// Operations the release flow needs from the hosting platform
///
/// All implementors must be `Send + Sync`. Implementations map transport and
/// status failures to [crate::error::ReleaseError::Api] or
/// [crate::error::ReleaseError::Transport]; only [`ReleaseHost::get_branch`]
/// turns a 404 into a value.
pub trait ReleaseHost: Send + Sync {
    /// One page (1-based) of pull requests in `state`, most recently updated first
    fn list_pull_requests(&self, state: ChangeState, page: u32, per_page: u32) -> Result<Vec<Change>>;

    /// Pull requests from `head` into `base`, most recently updated first
    fn list_pull_requests_between(
        &self,
        state: ChangeState,
        head: &str,
        base: &str,
        per_page: u32,
    ) -> Result<Vec<Change>>;

    /// Look up a branch; `Ok(None)` when it does not exist
    fn get_branch(&self, name: &str) -> Result<Option<Branch>>;

    /// Create `name` pointing at commit `sha`
    fn create_branch(&self, name: &str, sha: &str) -> Result<Branch>;

    /// Merge `head` into `base` with a merge commit
    fn merge_branch(&self, base: &str, head: &str, message: &str) -> Result<()>;

    /// Blob SHA of `path` on `branch`
    fn get_file_sha(&self, path: &str, branch: &str) -> Result<String>;

    fn commit_file(&self, commit: &FileCommit) -> Result<()>;

    /// Platform-generated notes for a (possibly not yet existing) tag
    fn generate_release_notes(&self, tag_name: &str, target: &str) -> Result<String>;

    fn create_pull_request(&self, pull_request: &NewPullRequest) -> Result<Change>;

    fn update_pull_request(&self, number: u64, title: &str, body: &str) -> Result<Change>;

    /// Add labels, keeping existing ones
    fn add_labels(&self, number: u64, labels: &[String]) -> Result<()>;

    /// Replace all labels
    fn set_labels(&self, number: u64, labels: &[String]) -> Result<()>;

    fn create_comment(&self, number: u64, body: &str) -> Result<()>;

    /// Create an annotated tag on commit `sha` and its `refs/tags/` reference
    fn create_tag(&self, tag: &str, message: &str, sha: &str) -> Result<Tag>;

    fn create_release(&self, release: &NewRelease) -> Result<PublishedRelease>;
}
