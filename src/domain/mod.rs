//! Domain logic - pure release rules independent of the hosting platform

pub mod bump;
pub mod change;
pub mod context;
pub mod labels;
pub mod prerelease;
pub mod tag;
pub mod version;

pub use bump::BumpLevel;
pub use change::{Change, ChangeState, ReleasePullRequestState};
pub use context::{Disposition, ReleaseContext};
pub use labels::ReleaseLabels;
pub use prerelease::PreReleaseChannel;
pub use tag::TagPattern;
pub use version::{Increment, SemanticVersion};
