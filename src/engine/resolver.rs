use crate::analyzer::{next_version, ChangeClassifier};
use crate::domain::{Change, ReleaseContext, ReleasePullRequestState};
use crate::error::Result;
use crate::hosting::release_repository::ReleasePullRequestLookup;
use crate::hosting::{ReleaseHost, ReleaseRepository};
use crate::inputs::RunInputs;
use crate::manifest::VersionManifest;
use crate::notes::create_release_pull_request_body;
use crate::warning::RunWarning;

/// Resolved context plus the warnings raised while building it
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub context: ReleaseContext,
    pub warnings: Vec<RunWarning>,
}

/// Builds the [`ReleaseContext`] for one run from the manifest and the platform
pub struct ReleaseStateResolver<'r, H: ReleaseHost + ?Sized, M: VersionManifest + ?Sized> {
    repository: &'r ReleaseRepository<'r, H>,
    manifest: &'r M,
    inputs: &'r RunInputs,
}

impl<'r, H: ReleaseHost + ?Sized, M: VersionManifest + ?Sized> ReleaseStateResolver<'r, H, M> {
    pub fn new(repository: &'r ReleaseRepository<'r, H>, manifest: &'r M, inputs: &'r RunInputs) -> Self {
        ReleaseStateResolver {
            repository,
            manifest,
            inputs,
        }
    }

    pub fn resolve(&self) -> Result<Resolution> {
        let package = self.manifest.read()?;
        let mut warnings = Vec::new();

        let merged = self.find(ReleasePullRequestState::Merged, &mut warnings)?;
        let open = self.find(ReleasePullRequestState::Open, &mut warnings)?;

        let changes = self.repository.collect_changes_since_last_release()?;
        let classifier = ChangeClassifier::new(&self.repository.config().labels);
        let bump_level = classifier.classify(&changes, package.version.as_ref());
        log::info!("Bump level: {}.", bump_level);

        log::info!(
            "Release as: {}.",
            display_or_none(self.inputs.release_as.as_ref())
        );
        log::info!(
            "Pre-release: {}.",
            display_or_none(self.inputs.pre_release.as_ref())
        );

        // An explicit version bypasses classification and channel arithmetic
        let next = match &self.inputs.release_as {
            Some(version) => Some(version.clone()),
            None => next_version(
                package.version.as_ref(),
                bump_level,
                self.inputs.pre_release.as_ref(),
            )?,
        };

        let release_notes = match &next {
            Some(version) => {
                let raw = self.repository.generate_notes(version)?;
                Some(create_release_pull_request_body(&raw))
            }
            None => None,
        };

        Ok(Resolution {
            context: ReleaseContext {
                package_name: package.name,
                current_version: package.version,
                next_version: next,
                is_manual_version: self.inputs.is_manual_version(),
                merged_release_pull_request: merged,
                open_release_pull_request: open,
                release_notes,
            },
            warnings,
        })
    }

    fn find(
        &self,
        state: ReleasePullRequestState,
        warnings: &mut Vec<RunWarning>,
    ) -> Result<Option<Change>> {
        let ReleasePullRequestLookup {
            pull_request,
            candidates,
            recovered,
        } = self.repository.find_release_pull_request(state)?;

        if candidates > 1 {
            warnings.push(RunWarning::MultipleReleasePullRequests { state });
        }
        if let (true, Some(pull_request)) = (recovered, &pull_request) {
            warnings.push(RunWarning::ReleasePullRequestRecovered {
                number: pull_request.number,
                label: self.repository.config().labels.ready.clone(),
            });
        }

        Ok(pull_request)
    }
}

fn display_or_none<T: std::fmt::Display>(value: Option<&T>) -> String {
    value
        .map(ToString::to_string)
        .unwrap_or_else(|| "none".to_string())
}
