//! Main workflow orchestration logic
//!
//! Runs one release-decision pass against a hosting platform and returns
//! everything the binary has to report. Nothing here prints; `main` decides
//! how annotations and outputs are surfaced.

use anyhow::Result;

use crate::config::Config;
use crate::domain::Disposition;
use crate::engine::{publish_release, ReconcileOutcome, Reconciler, ReleaseStateResolver};
use crate::hosting::{ReleaseHost, ReleaseRepository};
use crate::inputs::RunInputs;
use crate::manifest::VersionManifest;
use crate::ui::Annotation;

/// Observable results of a run, always reported even when absent
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunOutputs {
    pub current_version: Option<String>,
    /// First pre-release identifier of the current version
    pub pre_release: Option<String>,
    pub is_released: bool,
    pub next_version: Option<String>,
    pub release_pr: Option<u64>,
}

impl RunOutputs {
    /// Output names and values; absent values are empty strings
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("current-version", self.current_version.clone().unwrap_or_default()),
            ("pre-release", self.pre_release.clone().unwrap_or_default()),
            ("is-released", self.is_released.to_string()),
            ("next-version", self.next_version.clone().unwrap_or_default()),
            (
                "release-pr",
                self.release_pr.map(|n| n.to_string()).unwrap_or_default(),
            ),
        ]
    }
}

/// Result of a successful release workflow
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub disposition: Disposition,
    pub outputs: RunOutputs,
    /// Notices and warnings, in the order they were raised
    pub annotations: Vec<Annotation>,
}

/// Main release workflow
///
/// 1. Resolve the release context (manifest, release pull requests, changes)
/// 2. RELEASE: tag and publish the merged release pull request
/// 3. PREPARE: open or refresh the release pull request
/// 4. IDLE: report that nothing changed
pub fn run_release_workflow<H, M>(
    host: &H,
    manifest: &M,
    config: &Config,
    inputs: &RunInputs,
) -> Result<RunReport>
where
    H: ReleaseHost + ?Sized,
    M: VersionManifest + ?Sized,
{
    let repository = ReleaseRepository::new(host, config, inputs.sha.clone())?;
    let resolution = ReleaseStateResolver::new(&repository, manifest, inputs).resolve()?;
    let context = resolution.context;

    let mut annotations: Vec<Annotation> = resolution
        .warnings
        .iter()
        .map(|warning| Annotation::warning(warning.title(), warning.to_string()))
        .collect();
    let mut outputs = RunOutputs::default();

    match &context.current_version {
        Some(version) => {
            log::info!("Current version: {}", version);
            outputs.current_version = Some(version.to_string());
            outputs.pre_release = version.prerelease_channel();
        }
        None => log::info!("No current version."),
    }

    let disposition = context.disposition();
    if disposition != Disposition::Release && context.current_version.is_some() {
        annotations.push(Annotation::notice("No Release", "No pull request to release."));
    }

    match disposition {
        Disposition::Release => {
            let release = publish_release(&repository, &context)?;
            annotations.push(Annotation::notice(
                "Release Created",
                format!("Release {} created.", release.name),
            ));
            outputs.is_released = true;
        }
        Disposition::Prepare => {
            if let Some(next) = &context.next_version {
                annotations.push(Annotation::notice(
                    "Next Version",
                    format!("Next version is {}.", next),
                ));
                outputs.next_version = Some(next.to_string());
            }

            let outcome = Reconciler::new(&repository, manifest, inputs).reconcile(&context)?;
            if let Some(annotation) = outcome_annotation(&outcome) {
                annotations.push(annotation);
            }
            outputs.release_pr = outcome.pull_request_number();
        }
        Disposition::Idle => {
            annotations.push(Annotation::notice(
                "No Changes",
                "No changes since last release.",
            ));
        }
    }

    Ok(RunReport {
        disposition,
        outputs,
        annotations,
    })
}

fn outcome_annotation(outcome: &ReconcileOutcome) -> Option<Annotation> {
    match outcome {
        ReconcileOutcome::UpToDate(number) => Some(Annotation::notice(
            "Up To Date",
            format!(
                "No new changes since the last check. Release PR #{} is up to date.",
                number
            ),
        )),
        ReconcileOutcome::Opened(number) => Some(Annotation::notice(
            "PR Opened",
            format!("Release PR #{} has been opened.", number),
        )),
        ReconcileOutcome::Updated(number) => Some(Annotation::notice(
            "PR Updated",
            format!("The existing release PR #{} has been updated.", number),
        )),
        ReconcileOutcome::Skipped => None,
    }
}
