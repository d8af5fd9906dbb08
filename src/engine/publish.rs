use crate::domain::ReleaseContext;
use crate::error::{ReleaseError, Result};
use crate::hosting::release_repository::release_comment;
use crate::hosting::{PublishedRelease, ReleaseHost, ReleaseRepository};

/// Tag and publish the merged release pull request, then mark it done.
pub fn publish_release<H: ReleaseHost + ?Sized>(
    repository: &ReleaseRepository<'_, H>,
    context: &ReleaseContext,
) -> Result<PublishedRelease> {
    let (version, pull_request) = match (
        context.current_version.as_ref(),
        context.merged_release_pull_request.as_ref(),
    ) {
        (Some(version), Some(pull_request)) => (version, pull_request),
        _ => return Err(ReleaseError::version("No merged release pull request to publish.")),
    };

    log::info!("Releasing version {}...", version);
    let release = repository.tag_and_publish_release(pull_request, version, &context.package_name)?;
    repository.complete_release_pull_request(pull_request.number)?;
    repository.comment_pull_request(pull_request.number, &release_comment(&release))?;
    log::info!("Release completed.");

    Ok(release)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::domain::{Change, ChangeState, SemanticVersion};
    use crate::hosting::{HostCall, MockHost, NewRelease};
    use chrono::Utc;

    fn context(version: &str) -> ReleaseContext {
        ReleaseContext {
            package_name: "app".to_string(),
            current_version: Some(SemanticVersion::parse(version).unwrap()),
            next_version: None,
            is_manual_version: false,
            merged_release_pull_request: Some(
                Change::new(12, "chore(main): release v1.1.0-rc.0", ChangeState::Closed)
                    .with_labels(["release: ready"])
                    .merged(Utc::now(), "merge-sha"),
            ),
            open_release_pull_request: None,
            release_notes: None,
        }
    }

    #[test]
    fn test_publish_release_sequence() {
        let config = Config::default();
        let host = MockHost::new();
        let repository = ReleaseRepository::new(&host, &config, "head").unwrap();

        let release = publish_release(&repository, &context("1.1.0-rc.0")).unwrap();

        assert_eq!(release.name, "app v1.1.0-rc.0");
        assert_eq!(
            host.write_calls(),
            vec![
                HostCall::CreateTag {
                    tag: "v1.1.0-rc.0".to_string(),
                    message: "Release v1.1.0-rc.0".to_string(),
                    sha: "merge-sha".to_string(),
                },
                HostCall::CreateRelease(NewRelease {
                    tag_name: "v1.1.0-rc.0".to_string(),
                    name: "app v1.1.0-rc.0".to_string(),
                    prerelease: true,
                }),
                HostCall::SetLabels {
                    number: 12,
                    labels: vec!["release: done".to_string()],
                },
                HostCall::CreateComment {
                    number: 12,
                    body: ":package: [**app v1.1.0-rc.0**](https://example.test/releases/v1.1.0-rc.0) has been released.".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_release_failure_stops_before_completion() {
        let config = Config::default();
        let host = MockHost::new().with_failure("create_release", 422, "already_exists");
        let repository = ReleaseRepository::new(&host, &config, "head").unwrap();

        let err = publish_release(&repository, &context("1.1.0")).unwrap_err();

        assert_eq!(err.to_string(), "Error while creating release app v1.1.0.");
        assert!(!host
            .calls()
            .iter()
            .any(|call| matches!(call, HostCall::SetLabels { .. })));
    }
}
