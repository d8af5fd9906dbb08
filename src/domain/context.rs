use crate::domain::change::Change;
use crate::domain::version::SemanticVersion;

/// Everything resolved about the repository for one run.
///
/// Built once by the resolver and only read afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseContext {
    pub package_name: String,
    pub current_version: Option<SemanticVersion>,
    pub next_version: Option<SemanticVersion>,
    pub is_manual_version: bool,
    pub merged_release_pull_request: Option<Change>,
    pub open_release_pull_request: Option<Change>,
    pub release_notes: Option<String>,
}

/// What a run has to do, decided from a [`ReleaseContext`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// A merged release pull request awaits tagging
    Release,
    /// The pending release pull request must be opened or refreshed
    Prepare,
    /// Nothing changed since the last release
    Idle,
}

impl ReleaseContext {
    /// Release takes priority over Prepare; the two never happen in one run.
    pub fn disposition(&self) -> Disposition {
        if self.current_version.is_some() && self.merged_release_pull_request.is_some() {
            return Disposition::Release;
        }

        if self.merged_release_pull_request.is_some() {
            return Disposition::Idle;
        }

        let has_notes = self
            .release_notes
            .as_deref()
            .is_some_and(|notes| !notes.is_empty());
        if self.next_version.is_some() && (has_notes || self.is_manual_version) {
            Disposition::Prepare
        } else {
            Disposition::Idle
        }
    }
}
