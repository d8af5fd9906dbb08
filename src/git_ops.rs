use anyhow::Result;
use git2::Repository;
use std::path::Path;

use crate::inputs::RepositorySlug;

/// Wrapper around git2 Repository for discovering where a run points.
///
/// Only used when the CI environment does not provide the repository slug
/// or the commit SHA, e.g. when running from a developer checkout.
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Discovers the git repository in `path` or its parent directories.
    ///
    /// # Returns
    /// * `Ok(GitRepo)` - Successfully initialized repository wrapper
    /// * `Err` - If not in a git repository
    pub fn discover(path: impl AsRef<Path>) -> Result<Self> {
        let repo = match Repository::discover(path) {
            Ok(repo) => repo,
            Err(e) => return Err(anyhow::anyhow!("Not in a git repository: {}", e)),
        };
        Ok(GitRepo { repo })
    }

    /// `owner/repo` of the given remote, parsed from its URL
    pub fn remote_slug(&self, remote_name: &str) -> Result<RepositorySlug> {
        let remote = self
            .repo
            .find_remote(remote_name)
            .map_err(|_| anyhow::anyhow!("Remote '{}' not found", remote_name))?;
        let url = remote
            .url()
            .ok_or_else(|| anyhow::anyhow!("Remote '{}' has no valid URL", remote_name))?;

        parse_remote_url(url)
    }

    /// Get the current HEAD git hash (full 40-character SHA-1)
    pub fn head_sha(&self) -> Result<String> {
        let head = self.repo.head()?;
        let oid = head
            .target()
            .ok_or_else(|| anyhow::anyhow!("HEAD is detached or invalid"))?;
        Ok(oid.to_string())
    }
}

/// Extract `owner/repo` from an https or ssh remote URL.
///
/// Accepted forms:
/// - `https://github.com/owner/repo(.git)`
/// - `git@github.com:owner/repo(.git)`
/// - `ssh://git@github.com/owner/repo(.git)`
pub fn parse_remote_url(url: &str) -> Result<RepositorySlug> {
    let trimmed = url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    let path = if let Some((_, rest)) = trimmed.split_once("://") {
        rest.split_once('/').map(|(_, path)| path)
    } else {
        trimmed.split_once(':').map(|(_, path)| path)
    }
    .ok_or_else(|| anyhow::anyhow!("Unsupported remote URL '{}'", url))?;

    let mut segments = path.rsplit('/');
    match (segments.next(), segments.next()) {
        (Some(repo), Some(owner)) if !repo.is_empty() && !owner.is_empty() => {
            Ok(RepositorySlug::new(owner, repo))
        }
        _ => Err(anyhow::anyhow!("Unsupported remote URL '{}'", url)),
    }
}
