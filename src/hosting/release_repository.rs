use crate::config::Config;
use crate::domain::{Change, ChangeState, ReleasePullRequestState, SemanticVersion, TagPattern};
use crate::error::{try_execute, ReleaseError, Result};
use crate::hosting::{FileCommit, NewPullRequest, NewRelease, PublishedRelease, ReleaseHost};

/// Page size used when scanning closed pull requests
pub const CLOSED_PAGE_SIZE: u32 = 30;

/// Only the two most recently updated release pull requests are inspected
const RELEASE_PULL_REQUEST_PAGE_SIZE: u32 = 2;

/// Outcome of [`ReleaseRepository::ensure_release_branch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchStatus {
    Created,
    AlreadyExisted,
}

/// Result of looking up a release pull request
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleasePullRequestLookup {
    pub pull_request: Option<Change>,
    /// Labelled candidates seen; more than one means the choice was ambiguous
    pub candidates: usize,
    /// Found by title because it lost (or never got) the ready label
    pub recovered: bool,
}

/// Closed pull requests newer than the last completed release.
///
/// Pages are fetched on demand, most recently updated first. Iteration stops
/// at the first pull request carrying the `done` label, so pages past the
/// last release are never requested.
pub struct ChangesSinceRelease<'r, H: ReleaseHost + ?Sized> {
    host: &'r H,
    done_label: &'r str,
    per_page: u32,
    page: u32,
    buffer: std::vec::IntoIter<Change>,
    last_page: bool,
    finished: bool,
}

impl<'r, H: ReleaseHost + ?Sized> ChangesSinceRelease<'r, H> {
    pub fn new(host: &'r H, done_label: &'r str, per_page: u32) -> Self {
        ChangesSinceRelease {
            host,
            done_label,
            per_page,
            page: 0,
            buffer: Vec::new().into_iter(),
            last_page: false,
            finished: false,
        }
    }
}

impl<H: ReleaseHost + ?Sized> Iterator for ChangesSinceRelease<'_, H> {
    type Item = Result<Change>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }

            if let Some(change) = self.buffer.next() {
                if change.has_label(self.done_label) {
                    log::debug!("Last release pull request found: #{}.", change.number);
                    self.finished = true;
                    return None;
                }
                return Some(Ok(change));
            }

            if self.last_page {
                self.finished = true;
                return None;
            }

            self.page += 1;
            match self
                .host
                .list_pull_requests(ChangeState::Closed, self.page, self.per_page)
            {
                Ok(changes) => {
                    log::debug!("{} pull request(s) loaded...", changes.len());
                    self.last_page = changes.len() < self.per_page as usize;
                    self.buffer = changes.into_iter();
                }
                Err(error) => {
                    self.finished = true;
                    return Some(Err(error));
                }
            }
        }
    }
}

/// Comment posted on a release pull request once it has been released
pub fn release_comment(release: &PublishedRelease) -> String {
    format!(
        ":package: [**{}**]({}) has been released.",
        release.name, release.html_url
    )
}

/// Release-flow operations on top of a [`ReleaseHost`].
///
/// Each operation logs its progress and replaces any failure with a stable
/// "Error while ..." message; the original error stays available as the
/// source.
pub struct ReleaseRepository<'a, H: ReleaseHost + ?Sized> {
    host: &'a H,
    config: &'a Config,
    tag_pattern: TagPattern,
    head_sha: String,
}

impl<'a, H: ReleaseHost + ?Sized> ReleaseRepository<'a, H> {
    /// `head_sha` is the production commit the run was triggered on
    pub fn new(host: &'a H, config: &'a Config, head_sha: impl Into<String>) -> Result<Self> {
        Ok(ReleaseRepository {
            host,
            config,
            tag_pattern: config.release.tag_pattern()?,
            head_sha: head_sha.into(),
        })
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    pub fn tag_name(&self, version: &SemanticVersion) -> String {
        self.tag_pattern.format(version)
    }

    fn production(&self) -> &str {
        &self.config.branches.production
    }

    fn release_branch(&self) -> &str {
        &self.config.branches.release
    }

    fn ready_label(&self) -> &str {
        &self.config.labels.ready
    }

    fn title_prefix(&self) -> String {
        format!("chore({}): release ", self.production())
    }

    /// Title of the release pull request, also used as the manifest commit message
    pub fn release_title(&self, version: &SemanticVersion) -> String {
        format!("{}{}", self.title_prefix(), self.tag_name(version))
    }

    /// Whether `title` already names `version`
    pub fn title_encodes(&self, title: &str, version: &SemanticVersion) -> bool {
        title == self.release_title(version)
    }

    /// Whether `title` looks like any release pull request title
    pub fn is_release_title(&self, title: &str) -> bool {
        title
            .strip_prefix(&self.title_prefix())
            .is_some_and(|tag| self.tag_pattern.matches(tag))
    }

    pub fn manual_version_comment(&self, version: &SemanticVersion, actor: &str) -> String {
        format!(
            "Version `{}` has been manually requested by @{}.",
            version, actor
        )
    }

    /// Most recently updated release pull request in `state`.
    ///
    /// Candidates must carry the ready label (and a merge timestamp when
    /// `state` is merged). An open pull request with a release title but no
    /// label is adopted when no labelled candidate exists.
    pub fn find_release_pull_request(
        &self,
        state: ReleasePullRequestState,
    ) -> Result<ReleasePullRequestLookup> {
        try_execute(
            format!("Error while getting {} release pull request.", state),
            || {
                log::debug!("Getting {} release pull request...", state);
                let listed_state = match state {
                    ReleasePullRequestState::Open => ChangeState::Open,
                    ReleasePullRequestState::Merged => ChangeState::Closed,
                };
                let listed = self.host.list_pull_requests_between(
                    listed_state,
                    self.release_branch(),
                    self.production(),
                    RELEASE_PULL_REQUEST_PAGE_SIZE,
                )?;

                let mut candidates = listed.iter().filter(|change| {
                    change.has_label(self.ready_label())
                        && (state == ReleasePullRequestState::Open || change.is_merged())
                });
                let found = candidates.next().cloned();
                let count = usize::from(found.is_some()) + candidates.count();

                let lookup = match found {
                    Some(pull_request) => ReleasePullRequestLookup {
                        pull_request: Some(pull_request),
                        candidates: count,
                        recovered: false,
                    },
                    None if state == ReleasePullRequestState::Open => {
                        let recovered = listed
                            .into_iter()
                            .find(|change| self.is_release_title(&change.title));
                        ReleasePullRequestLookup {
                            recovered: recovered.is_some(),
                            pull_request: recovered,
                            candidates: 0,
                        }
                    }
                    None => ReleasePullRequestLookup::default(),
                };

                match &lookup.pull_request {
                    Some(pull_request) => log::info!(
                        "Release pull request ({}) found: #{}.",
                        state,
                        pull_request.number
                    ),
                    None => log::info!("No {} release pull request found.", state),
                }

                Ok(lookup)
            },
        )
    }

    /// Lazily paginated closed pull requests since the last release
    pub fn changes_since_last_release(&self) -> ChangesSinceRelease<'a, H> {
        let config: &'a Config = self.config;
        ChangesSinceRelease::new(self.host, &config.labels.done, CLOSED_PAGE_SIZE)
    }

    pub fn collect_changes_since_last_release(&self) -> Result<Vec<Change>> {
        try_execute("Error while getting pull requests since last release.", || {
            log::debug!("Getting pull requests since last release...");
            let changes = self
                .changes_since_last_release()
                .collect::<Result<Vec<_>>>()?;
            log::info!(
                "{} pull request(s) found since last release.",
                changes.len()
            );

            Ok(changes)
        })
    }

    /// Raw platform notes for the release of `version` at the run's commit
    pub fn generate_notes(&self, version: &SemanticVersion) -> Result<String> {
        let tag_name = self.tag_name(version);
        try_execute(
            format!("Error while generating release notes for {}.", tag_name),
            || {
                log::debug!("Generating release notes for {}...", tag_name);
                let notes = self.host.generate_release_notes(&tag_name, &self.head_sha)?;
                log::info!("Release notes generated for {}.", tag_name);

                Ok(notes)
            },
        )
    }

    pub fn release_branch_exists(&self) -> Result<bool> {
        try_execute(
            format!("Error while getting branch \"{}\".", self.release_branch()),
            || {
                log::debug!("Getting branch \"{}\"...", self.release_branch());
                let branch = self.host.get_branch(self.release_branch())?;
                match &branch {
                    Some(_) => log::info!("Branch \"{}\" found.", self.release_branch()),
                    None => log::info!("Branch \"{}\" not found.", self.release_branch()),
                }

                Ok(branch.is_some())
            },
        )
    }

    /// Create the release branch from the run's commit unless it exists
    pub fn ensure_release_branch(&self) -> Result<BranchStatus> {
        if self.release_branch_exists()? {
            return Ok(BranchStatus::AlreadyExisted);
        }

        try_execute(
            format!("Error while creating branch \"{}\".", self.release_branch()),
            || {
                log::debug!("Creating branch \"{}\"...", self.release_branch());
                self.host.create_branch(self.release_branch(), &self.head_sha)?;
                log::info!("Branch \"{}\" created.", self.release_branch());

                Ok(BranchStatus::Created)
            },
        )
    }

    pub fn merge_production_into_release_branch(&self) -> Result<()> {
        try_execute(
            format!(
                "Error while merging branch \"{}\" into \"{}\".",
                self.production(),
                self.release_branch()
            ),
            || {
                log::debug!(
                    "Merging branch \"{}\" into \"{}\"...",
                    self.production(),
                    self.release_branch()
                );
                let message = format!(
                    "chore({}): merge \"{}\"",
                    self.production(),
                    self.production()
                );
                self.host
                    .merge_branch(self.release_branch(), self.production(), &message)?;
                log::info!(
                    "Branch \"{}\" merged into \"{}\".",
                    self.production(),
                    self.release_branch()
                );

                Ok(())
            },
        )
    }

    /// Blob SHA of the manifest on the release branch
    pub fn manifest_sha(&self, path: &str) -> Result<String> {
        try_execute(format!("Error while getting {} file SHA.", path), || {
            log::debug!("Getting {} file SHA...", path);
            let sha = self.host.get_file_sha(path, self.release_branch())?;
            log::debug!("{} file SHA: \"{}\".", path, sha);
            log::info!("{} file SHA retrieved.", path);

            Ok(sha)
        })
    }

    pub fn commit_manifest(
        &self,
        path: &str,
        sha: &str,
        content: &str,
        version: &SemanticVersion,
    ) -> Result<()> {
        try_execute(
            format!("Error while commiting to branch \"{}\".", self.release_branch()),
            || {
                log::debug!("Commiting to branch \"{}\"...", self.release_branch());
                self.host.commit_file(&FileCommit {
                    path: path.to_string(),
                    branch: self.release_branch().to_string(),
                    message: self.release_title(version),
                    content: content.to_string(),
                    sha: sha.to_string(),
                })?;
                log::info!("Commit created to branch \"{}\".", self.release_branch());

                Ok(())
            },
        )
    }

    pub fn create_release_pull_request(&self, version: &SemanticVersion, body: &str) -> Result<Change> {
        let title = self.release_title(version);
        try_execute(
            format!("Error while creating release pull request \"{}\".", title),
            || {
                log::debug!("Creating release pull request \"{}\"...", title);
                let created = self.host.create_pull_request(&NewPullRequest {
                    title: title.clone(),
                    head: self.release_branch().to_string(),
                    base: self.production().to_string(),
                    body: body.to_string(),
                })?;
                log::info!(
                    "Release pull request \"{}\" created: #{}.",
                    title,
                    created.number
                );

                Ok(created)
            },
        )
    }

    pub fn update_release_pull_request(
        &self,
        number: u64,
        version: &SemanticVersion,
        body: &str,
    ) -> Result<Change> {
        try_execute(
            format!("Error while updating release pull request #{}.", number),
            || {
                log::debug!("Updating release pull request #{}...", number);
                let updated =
                    self.host
                        .update_pull_request(number, &self.release_title(version), body)?;
                log::info!("Release pull request #{} updated.", number);

                Ok(updated)
            },
        )
    }

    /// Attach the ready label; always a separate call from creation
    pub fn label_release_pull_request(&self, number: u64) -> Result<()> {
        let label = self.ready_label();
        try_execute(
            format!(
                "Error while adding label \"{}\" to release pull request #{}.",
                label, number
            ),
            || {
                log::debug!(
                    "Adding label \"{}\" to release pull request #{}...",
                    label,
                    number
                );
                self.host.add_labels(number, &[label.to_string()])?;
                log::info!(
                    "Label \"{}\" added to release pull request #{}.",
                    label,
                    number
                );

                Ok(())
            },
        )
    }

    pub fn comment_pull_request(&self, number: u64, body: &str) -> Result<()> {
        try_execute(
            format!(
                "Error while adding comment to release pull request #{}.",
                number
            ),
            || {
                log::debug!("Adding comment to release pull request #{}...", number);
                self.host.create_comment(number, body)?;
                log::info!("Comment added to release pull request #{}.", number);

                Ok(())
            },
        )
    }

    /// Tag the merge commit of `pull_request` and publish the release
    pub fn tag_and_publish_release(
        &self,
        pull_request: &Change,
        version: &SemanticVersion,
        package_name: &str,
    ) -> Result<PublishedRelease> {
        let tag = try_execute("Error while creating release tag.", || {
            log::debug!("Creating release tag.");
            let sha = pull_request.merge_commit_sha.as_deref().ok_or_else(|| {
                ReleaseError::version(format!(
                    "Pull request #{} has no merge commit SHA.",
                    pull_request.number
                ))
            })?;
            let tag_name = self.tag_name(version);
            let tag = self
                .host
                .create_tag(&tag_name, &format!("Release {}", tag_name), sha)?;
            log::info!("Release tag \"{}\" created.", tag.tag);

            Ok(tag)
        })?;

        let release_name = format!("{} {}", package_name, tag.tag);
        try_execute(
            format!("Error while creating release {}.", release_name),
            || {
                log::debug!("Creating release \"{}\"...", release_name);
                let release = self.host.create_release(&NewRelease {
                    tag_name: tag.tag.clone(),
                    name: release_name.clone(),
                    prerelease: version.is_prerelease(),
                })?;
                log::info!("Release \"{}\" created.", release.name);

                Ok(release)
            },
        )
    }

    /// Replace all labels of a released pull request with the done label
    pub fn complete_release_pull_request(&self, number: u64) -> Result<()> {
        try_execute(
            format!("Error while updating release pull request #{}.", number),
            || {
                log::debug!("Updating release pull request #{}...", number);
                self.host
                    .set_labels(number, &[self.config.labels.done.clone()])?;
                log::info!("Release pull request #{} updated.", number);

                Ok(())
            },
        )
    }
}
