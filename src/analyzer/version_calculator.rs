use crate::domain::{BumpLevel, Increment, PreReleaseChannel, SemanticVersion};
use crate::error::Result;

/// Computes the next version from the current one and a bump level.
///
/// A missing current version starts from `0.0.0`. Without a pre-release
/// channel, `BumpLevel::None` means there is nothing to release. With a
/// channel, `None` advances the pre-release counter and any other level opens
/// a fresh `<channel>.0` sequence on the bumped component.
pub fn next_version(
    current: Option<&SemanticVersion>,
    bump_level: BumpLevel,
    pre_release: Option<&PreReleaseChannel>,
) -> Result<Option<SemanticVersion>> {
    let version = current.cloned().unwrap_or_else(SemanticVersion::initial);

    let increment = match (pre_release, bump_level) {
        (Some(channel), BumpLevel::None) => Increment::PreRelease(channel),
        (Some(channel), BumpLevel::Patch) => Increment::PrePatch(channel),
        (Some(channel), BumpLevel::Minor) => Increment::PreMinor(channel),
        (Some(channel), BumpLevel::Major) => Increment::PreMajor(channel),
        (None, BumpLevel::None) => return Ok(None),
        (None, BumpLevel::Patch) => Increment::Patch,
        (None, BumpLevel::Minor) => Increment::Minor,
        (None, BumpLevel::Major) => Increment::Major,
    };

    version.increment(increment).map(Some)
}
