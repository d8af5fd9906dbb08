use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use release_pr::cli::run_release_workflow;
use release_pr::config;
use release_pr::git_ops::GitRepo;
use release_pr::hosting::github::DEFAULT_API_URL;
use release_pr::hosting::GitHubHost;
use release_pr::inputs::{self, RepositorySlug, RunInputs};
use release_pr::manifest::PackageJsonManifest;
use release_pr::ui::{self, Annotation};

#[derive(clap::Parser)]
#[command(
    name = "release-pr",
    version,
    about = "Open release pull requests and publish releases from labelled pull requests"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, help = "API token")]
    token: Option<String>,

    #[arg(long, env = "GITHUB_REPOSITORY", help = "Repository as owner/repo [default: origin remote]")]
    repository: Option<String>,

    #[arg(long, env = "GITHUB_SHA", help = "Commit the run was triggered on [default: HEAD]")]
    sha: Option<String>,

    #[arg(long, env = "GITHUB_EVENT_NAME", default_value = "push", help = "Triggering event")]
    event_name: String,

    #[arg(long, env = "GITHUB_ACTOR", default_value = "", help = "User who triggered the run")]
    actor: String,

    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL, help = "REST API base URL")]
    api_url: String,

    #[arg(long = "pre-release", env = "INPUT_PRE-RELEASE", default_value = "", help = "Pre-release channel (e.g. beta)")]
    pre_release: String,

    #[arg(long = "release-as", env = "INPUT_RELEASE-AS", default_value = "", help = "Explicit version to release")]
    release_as: String,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::emit(&Annotation::error(e.to_string()));
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let token = inputs::require_token(args.token.as_deref())?;
    let config = config::load_config(args.config.as_deref())?;
    let pre_release = inputs::parse_pre_release(&args.pre_release)?;
    let release_as = inputs::parse_release_as(&args.release_as)?;
    let (repository, sha) = locate(non_empty(args.repository), non_empty(args.sha))?;

    let inputs = RunInputs {
        sha,
        actor: args.actor,
        event_name: args.event_name,
        pre_release,
        release_as,
    };
    log::debug!("Running on {} at {}.", repository, inputs.sha);

    let host = GitHubHost::new(args.api_url, token, repository);
    let manifest = PackageJsonManifest::new(&config.release.manifest);

    ui::start_group("Release PR");
    let report = run_release_workflow(&host, &manifest, &config, &inputs);
    ui::end_group();
    let report = report?;

    for annotation in &report.annotations {
        ui::emit(annotation);
    }
    ui::write_outputs(&report.outputs.entries())?;

    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Fill in whatever the environment did not provide from the local checkout
fn locate(repository: Option<String>, sha: Option<String>) -> Result<(RepositorySlug, String)> {
    if let (Some(repository), Some(sha)) = (&repository, &sha) {
        return Ok((repository.parse::<RepositorySlug>()?, sha.clone()));
    }

    let git_repo = GitRepo::discover(".")?;
    let slug = match repository {
        Some(repository) => repository.parse::<RepositorySlug>()?,
        None => git_repo.remote_slug("origin")?,
    };
    let sha = match sha {
        Some(sha) => sha,
        None => git_repo.head_sha()?,
    };

    Ok((slug, sha))
}
