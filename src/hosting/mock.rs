use crate::domain::{Change, ChangeState};
use crate::error::{ReleaseError, Result};
use crate::hosting::{
    Branch, FileCommit, NewPullRequest, NewRelease, PublishedRelease, ReleaseHost, Tag,
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One call received by [`MockHost`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    ListPullRequests { state: ChangeState, page: u32 },
    ListPullRequestsBetween { state: ChangeState, head: String, base: String },
    GetBranch(String),
    CreateBranch { name: String, sha: String },
    MergeBranch { base: String, head: String, message: String },
    GetFileSha { path: String, branch: String },
    CommitFile(FileCommit),
    GenerateReleaseNotes { tag_name: String, target: String },
    CreatePullRequest(NewPullRequest),
    UpdatePullRequest { number: u64, title: String, body: String },
    AddLabels { number: u64, labels: Vec<String> },
    SetLabels { number: u64, labels: Vec<String> },
    CreateComment { number: u64, body: String },
    CreateTag { tag: String, message: String, sha: String },
    CreateRelease(NewRelease),
}

impl HostCall {
    /// Whether the call changes state on the platform
    pub fn is_write(&self) -> bool {
        !matches!(
            self,
            HostCall::ListPullRequests { .. }
                | HostCall::ListPullRequestsBetween { .. }
                | HostCall::GetBranch(_)
                | HostCall::GetFileSha { .. }
                | HostCall::GenerateReleaseNotes { .. }
        )
    }

    fn operation(&self) -> &'static str {
        match self {
            HostCall::ListPullRequests { .. } => "list_pull_requests",
            HostCall::ListPullRequestsBetween { .. } => "list_pull_requests_between",
            HostCall::GetBranch(_) => "get_branch",
            HostCall::CreateBranch { .. } => "create_branch",
            HostCall::MergeBranch { .. } => "merge_branch",
            HostCall::GetFileSha { .. } => "get_file_sha",
            HostCall::CommitFile(_) => "commit_file",
            HostCall::GenerateReleaseNotes { .. } => "generate_release_notes",
            HostCall::CreatePullRequest(_) => "create_pull_request",
            HostCall::UpdatePullRequest { .. } => "update_pull_request",
            HostCall::AddLabels { .. } => "add_labels",
            HostCall::SetLabels { .. } => "set_labels",
            HostCall::CreateComment { .. } => "create_comment",
            HostCall::CreateTag { .. } => "create_tag",
            HostCall::CreateRelease(_) => "create_release",
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    closed_pages: Vec<Vec<Change>>,
    release_pull_requests: Vec<Change>,
    branches: HashMap<String, String>,
    release_notes: String,
    file_sha: String,
    next_number: u64,
    failures: HashMap<&'static str, (u16, String)>,
    calls: Vec<HostCall>,
}

/// In-memory hosting platform for tests
///
/// Serves scripted pull request pages and branches, and records every call
/// so tests can assert on the exact side effects of a run.
#[derive(Debug)]
pub struct MockHost {
    state: Mutex<MockState>,
}

impl MockHost {
    /// Create an empty host: no pull requests, no branches, empty notes
    pub fn new() -> Self {
        MockHost {
            state: Mutex::new(MockState {
                file_sha: "manifest-sha".to_string(),
                next_number: 100,
                ..MockState::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append one page of closed pull requests, most recently updated first
    pub fn with_closed_page(self, changes: Vec<Change>) -> Self {
        self.state().closed_pages.push(changes);
        self
    }

    /// Register a pull request from the release branch to production.
    ///
    /// Pull requests are listed in registration order, so register the most
    /// recently updated one first.
    pub fn with_release_pull_request(self, change: Change) -> Self {
        self.state().release_pull_requests.push(change);
        self
    }

    pub fn with_branch(self, name: impl Into<String>, sha: impl Into<String>) -> Self {
        self.state().branches.insert(name.into(), sha.into());
        self
    }

    /// Raw notes returned by release notes generation
    pub fn with_release_notes(self, notes: impl Into<String>) -> Self {
        self.state().release_notes = notes.into();
        self
    }

    /// Make `operation` (a [`ReleaseHost`] method name) fail with `status`
    pub fn with_failure(self, operation: &'static str, status: u16, message: impl Into<String>) -> Self {
        self.state().failures.insert(operation, (status, message.into()));
        self
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<HostCall> {
        self.state().calls.clone()
    }

    /// Calls that changed state on the platform
    pub fn write_calls(&self) -> Vec<HostCall> {
        self.calls().into_iter().filter(HostCall::is_write).collect()
    }

    /// Number of closed pull request pages fetched
    pub fn closed_page_fetches(&self) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| {
                matches!(
                    call,
                    HostCall::ListPullRequests {
                        state: ChangeState::Closed,
                        ..
                    }
                )
            })
            .count()
    }

    /// Record `call`, then fail if a failure was scripted for it
    fn record(&self, call: HostCall) -> Result<MutexGuard<'_, MockState>> {
        let mut state = self.state();
        let operation = call.operation();
        state.calls.push(call);
        let failure = state.failures.get(operation).cloned();
        match failure {
            Some((status, message)) => Err(ReleaseError::api(status, message)),
            None => Ok(state),
        }
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ReleaseHost for MockHost {
    fn list_pull_requests(&self, state: ChangeState, page: u32, per_page: u32) -> Result<Vec<Change>> {
        let mock = self.record(HostCall::ListPullRequests { state, page })?;
        let index = page.saturating_sub(1) as usize;
        let changes = match state {
            ChangeState::Closed => mock.closed_pages.get(index).cloned().unwrap_or_default(),
            ChangeState::Open => Vec::new(),
        };
        Ok(changes.into_iter().take(per_page as usize).collect())
    }

    fn list_pull_requests_between(
        &self,
        state: ChangeState,
        head: &str,
        base: &str,
        per_page: u32,
    ) -> Result<Vec<Change>> {
        let mock = self.record(HostCall::ListPullRequestsBetween {
            state,
            head: head.to_string(),
            base: base.to_string(),
        })?;
        Ok(mock
            .release_pull_requests
            .iter()
            .filter(|change| change.state == state)
            .take(per_page as usize)
            .cloned()
            .collect())
    }

    fn get_branch(&self, name: &str) -> Result<Option<Branch>> {
        let mock = self.record(HostCall::GetBranch(name.to_string()))?;
        Ok(mock.branches.get(name).map(|sha| Branch {
            name: name.to_string(),
            sha: sha.clone(),
        }))
    }

    fn create_branch(&self, name: &str, sha: &str) -> Result<Branch> {
        let mut mock = self.record(HostCall::CreateBranch {
            name: name.to_string(),
            sha: sha.to_string(),
        })?;
        mock.branches.insert(name.to_string(), sha.to_string());
        Ok(Branch {
            name: name.to_string(),
            sha: sha.to_string(),
        })
    }

    fn merge_branch(&self, base: &str, head: &str, message: &str) -> Result<()> {
        let _recorded = self.record(HostCall::MergeBranch {
            base: base.to_string(),
            head: head.to_string(),
            message: message.to_string(),
        })?;
        Ok(())
    }

    fn get_file_sha(&self, path: &str, branch: &str) -> Result<String> {
        let mock = self.record(HostCall::GetFileSha {
            path: path.to_string(),
            branch: branch.to_string(),
        })?;
        Ok(mock.file_sha.clone())
    }

    fn commit_file(&self, commit: &FileCommit) -> Result<()> {
        let _recorded = self.record(HostCall::CommitFile(commit.clone()))?;
        Ok(())
    }

    fn generate_release_notes(&self, tag_name: &str, target: &str) -> Result<String> {
        let mock = self.record(HostCall::GenerateReleaseNotes {
            tag_name: tag_name.to_string(),
            target: target.to_string(),
        })?;
        Ok(mock.release_notes.clone())
    }

    fn create_pull_request(&self, pull_request: &NewPullRequest) -> Result<Change> {
        let mut mock = self.record(HostCall::CreatePullRequest(pull_request.clone()))?;
        let number = mock.next_number;
        mock.next_number += 1;

        let created = Change::new(number, pull_request.title.clone(), ChangeState::Open)
            .with_body(pull_request.body.clone());
        mock.release_pull_requests.insert(0, created.clone());
        Ok(created)
    }

    fn update_pull_request(&self, number: u64, title: &str, body: &str) -> Result<Change> {
        let mut mock = self.record(HostCall::UpdatePullRequest {
            number,
            title: title.to_string(),
            body: body.to_string(),
        })?;
        let existing = mock
            .release_pull_requests
            .iter_mut()
            .find(|change| change.number == number);

        match existing {
            Some(change) => {
                change.title = title.to_string();
                change.body = Some(body.to_string());
                Ok(change.clone())
            }
            None => Err(ReleaseError::api(404, format!("Pull request #{} not found", number))),
        }
    }

    fn add_labels(&self, number: u64, labels: &[String]) -> Result<()> {
        let mut mock = self.record(HostCall::AddLabels {
            number,
            labels: labels.to_vec(),
        })?;
        if let Some(change) = mock
            .release_pull_requests
            .iter_mut()
            .find(|change| change.number == number)
        {
            change.labels.extend(labels.iter().cloned());
        }
        Ok(())
    }

    fn set_labels(&self, number: u64, labels: &[String]) -> Result<()> {
        let mut mock = self.record(HostCall::SetLabels {
            number,
            labels: labels.to_vec(),
        })?;
        if let Some(change) = mock
            .release_pull_requests
            .iter_mut()
            .find(|change| change.number == number)
        {
            change.labels = labels.iter().cloned().collect();
        }
        Ok(())
    }

    fn create_comment(&self, number: u64, body: &str) -> Result<()> {
        let _recorded = self.record(HostCall::CreateComment {
            number,
            body: body.to_string(),
        })?;
        Ok(())
    }

    fn create_tag(&self, tag: &str, message: &str, sha: &str) -> Result<Tag> {
        let _recorded = self.record(HostCall::CreateTag {
            tag: tag.to_string(),
            message: message.to_string(),
            sha: sha.to_string(),
        })?;
        Ok(Tag {
            tag: tag.to_string(),
            sha: format!("tag-{}", sha),
        })
    }

    fn create_release(&self, release: &NewRelease) -> Result<PublishedRelease> {
        let _recorded = self.record(HostCall::CreateRelease(release.clone()))?;
        Ok(PublishedRelease {
            name: release.name.clone(),
            html_url: format!("https://example.test/releases/{}", release.tag_name),
        })
    }
}
