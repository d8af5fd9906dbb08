use crate::domain::ReleaseContext;
use crate::error::{ReleaseError, Result};
use crate::hosting::{BranchStatus, ReleaseHost, ReleaseRepository};
use crate::inputs::RunInputs;
use crate::manifest::VersionManifest;
use crate::notes::get_diff_markdown;

/// What the prepare path did to the release pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Title and body already matched; nothing was written
    UpToDate(u64),
    /// A new release pull request was opened
    Opened(u64),
    /// The existing release pull request was refreshed
    Updated(u64),
    /// No release pull request exists and creation is disabled
    Skipped,
}

impl ReconcileOutcome {
    pub fn pull_request_number(&self) -> Option<u64> {
        match self {
            ReconcileOutcome::UpToDate(number)
            | ReconcileOutcome::Opened(number)
            | ReconcileOutcome::Updated(number) => Some(*number),
            ReconcileOutcome::Skipped => None,
        }
    }
}

/// Converges the release branch and pull request on the next version.
pub struct Reconciler<'r, H: ReleaseHost + ?Sized, M: VersionManifest + ?Sized> {
    repository: &'r ReleaseRepository<'r, H>,
    manifest: &'r M,
    inputs: &'r RunInputs,
}

impl<'r, H: ReleaseHost + ?Sized, M: VersionManifest + ?Sized> Reconciler<'r, H, M> {
    pub fn new(repository: &'r ReleaseRepository<'r, H>, manifest: &'r M, inputs: &'r RunInputs) -> Self {
        Reconciler {
            repository,
            manifest,
            inputs,
        }
    }

    pub fn reconcile(&self, context: &ReleaseContext) -> Result<ReconcileOutcome> {
        let version = context
            .next_version
            .as_ref()
            .ok_or_else(|| ReleaseError::version("No next version to prepare."))?;
        let notes = context.release_notes.as_deref().unwrap_or("");
        let open = context.open_release_pull_request.as_ref();
        let config = self.repository.config();
        let ready_label = config.labels.ready.as_str();

        if let Some(open) = open {
            if open.has_label(ready_label)
                && self.repository.title_encodes(&open.title, version)
                && open.body_text() == notes
            {
                log::info!("Release pull request #{} is up to date.", open.number);
                return Ok(ReconcileOutcome::UpToDate(open.number));
            }
        }

        log::info!("Preparing new release...");
        match open {
            Some(_) if config.behavior.keep_release_branch_updated => {
                self.repository.merge_production_into_release_branch()?;
            }
            Some(_) => {}
            None if config.behavior.skip_pull_request_creation => {
                // A branch left by an earlier cycle still follows production
                if self.repository.release_branch_exists()? {
                    self.repository.merge_production_into_release_branch()?;
                }
                log::info!("Release PR creation skipped.");
                return Ok(ReconcileOutcome::Skipped);
            }
            None => {
                if self.repository.ensure_release_branch()? == BranchStatus::AlreadyExisted {
                    self.repository.merge_production_into_release_branch()?;
                }
            }
        }

        let version_committed =
            open.is_some_and(|open| self.repository.title_encodes(&open.title, version));
        if !version_committed {
            let path = self.manifest.repository_path();
            let content = self.manifest.encoded_with_version(version)?;
            let sha = self.repository.manifest_sha(path)?;
            self.repository.commit_manifest(path, &sha, &content, version)?;
        }

        let outcome = match open {
            None => {
                let created = self.repository.create_release_pull_request(version, notes)?;
                self.repository.label_release_pull_request(created.number)?;
                ReconcileOutcome::Opened(created.number)
            }
            Some(open) => {
                self.repository
                    .update_release_pull_request(open.number, version, notes)?;
                if !open.has_label(ready_label) {
                    self.repository.label_release_pull_request(open.number)?;
                }
                ReconcileOutcome::Updated(open.number)
            }
        };

        let mut comments = Vec::new();
        if context.is_manual_version {
            comments.push(
                self.repository
                    .manual_version_comment(version, &self.inputs.actor),
            );
        }
        if let Some(diff) = open.and_then(|open| get_diff_markdown(open.body_text(), notes)) {
            comments.push(diff);
        }
        if let Some(number) = outcome.pull_request_number() {
            if !comments.is_empty() {
                self.repository
                    .comment_pull_request(number, &comments.join("\n\n"))?;
            }
        }

        log::info!("New release prepared.");
        Ok(outcome)
    }
}
