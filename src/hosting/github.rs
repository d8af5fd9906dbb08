use crate::domain::{Change, ChangeState};
use crate::error::{ReleaseError, Result};
use crate::hosting::{
    Branch, FileCommit, NewPullRequest, NewRelease, PublishedRelease, ReleaseHost, Tag,
};
use crate::inputs::RepositorySlug;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("release-pr/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2022-11-28";

/// [`ReleaseHost`] backed by the GitHub REST API
pub struct GitHubHost {
    agent: ureq::Agent,
    api_url: String,
    token: String,
    repository: RepositorySlug,
}

#[derive(Debug, Deserialize)]
struct LabelDto {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PullRequestDto {
    number: u64,
    title: String,
    state: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    labels: Vec<LabelDto>,
    #[serde(default)]
    merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    merge_commit_sha: Option<String>,
}

impl From<PullRequestDto> for Change {
    fn from(dto: PullRequestDto) -> Self {
        Change {
            number: dto.number,
            title: dto.title,
            state: if dto.state == "open" {
                ChangeState::Open
            } else {
                ChangeState::Closed
            },
            labels: dto.labels.into_iter().map(|label| label.name).collect(),
            merged_at: dto.merged_at,
            updated_at: dto.updated_at,
            body: dto.body,
            merge_commit_sha: dto.merge_commit_sha,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ShaDto {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct BranchDto {
    name: String,
    commit: ShaDto,
}

#[derive(Debug, Deserialize)]
struct RefDto {
    object: ShaDto,
}

#[derive(Debug, Deserialize)]
struct NotesDto {
    body: String,
}

#[derive(Debug, Deserialize)]
struct TagDto {
    tag: String,
    sha: String,
}

#[derive(Debug, Deserialize)]
struct ReleaseDto {
    #[serde(default)]
    name: Option<String>,
    tag_name: String,
    html_url: String,
}

impl GitHubHost {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>, repository: RepositorySlug) -> Self {
        GitHubHost {
            agent: ureq::AgentBuilder::new().build(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            repository,
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.api_url, self.repository.owner, self.repository.repo, path
        )
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        log::debug!("{} {}", method, path);
        self.agent
            .request(method, &self.url(path))
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/vnd.github+json")
            .set("X-GitHub-Api-Version", API_VERSION)
            .set("User-Agent", USER_AGENT)
    }

    fn fetch<T: DeserializeOwned>(&self, request: ureq::Request) -> Result<T> {
        let response = request.call().map_err(map_error)?;
        parse_json(response)
    }

    fn send<T: DeserializeOwned>(&self, request: ureq::Request, body: Value) -> Result<T> {
        let response = request.send_json(body).map_err(map_error)?;
        parse_json(response)
    }

    fn send_ignoring_body(&self, request: ureq::Request, body: Value) -> Result<()> {
        request.send_json(body).map_err(map_error)?;
        Ok(())
    }
}

fn parse_json<T: DeserializeOwned>(response: ureq::Response) -> Result<T> {
    response
        .into_json::<T>()
        .map_err(|e| ReleaseError::transport(format!("Invalid response body: {}", e)))
}

fn map_error(error: ureq::Error) -> ReleaseError {
    match error {
        ureq::Error::Status(status, response) => {
            let body = response.into_string().unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|value| value.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or(body);
            ReleaseError::api(status, message)
        }
        ureq::Error::Transport(transport) => ReleaseError::transport(transport.to_string()),
    }
}

impl ReleaseHost for GitHubHost {
    fn list_pull_requests(&self, state: ChangeState, page: u32, per_page: u32) -> Result<Vec<Change>> {
        let request = self
            .request("GET", "/pulls")
            .query("state", &state.to_string())
            .query("sort", "updated")
            .query("direction", "desc")
            .query("per_page", &per_page.to_string())
            .query("page", &page.to_string());
        let pull_requests: Vec<PullRequestDto> = self.fetch(request)?;

        Ok(pull_requests.into_iter().map(Change::from).collect())
    }

    fn list_pull_requests_between(
        &self,
        state: ChangeState,
        head: &str,
        base: &str,
        per_page: u32,
    ) -> Result<Vec<Change>> {
        let request = self
            .request("GET", "/pulls")
            .query("state", &state.to_string())
            .query("head", &format!("{}:{}", self.repository.owner, head))
            .query("base", base)
            .query("sort", "updated")
            .query("direction", "desc")
            .query("per_page", &per_page.to_string());
        let pull_requests: Vec<PullRequestDto> = self.fetch(request)?;

        Ok(pull_requests.into_iter().map(Change::from).collect())
    }

    fn get_branch(&self, name: &str) -> Result<Option<Branch>> {
        let request = self.request("GET", &format!("/branches/{}", name));
        match self.fetch::<BranchDto>(request) {
            Ok(branch) => Ok(Some(Branch {
                name: branch.name,
                sha: branch.commit.sha,
            })),
            Err(error) if error.is_not_found() => Ok(None),
            Err(error) => Err(error),
        }
    }

    fn create_branch(&self, name: &str, sha: &str) -> Result<Branch> {
        let request = self.request("POST", "/git/refs");
        let created: RefDto = self.send(
            request,
            json!({ "ref": format!("refs/heads/{}", name), "sha": sha }),
        )?;

        Ok(Branch {
            name: name.to_string(),
            sha: created.object.sha,
        })
    }

    fn merge_branch(&self, base: &str, head: &str, message: &str) -> Result<()> {
        // 204 (nothing to merge) has no body
        let request = self.request("POST", "/merges");
        self.send_ignoring_body(
            request,
            json!({ "base": base, "head": head, "commit_message": message }),
        )
    }

    fn get_file_sha(&self, path: &str, branch: &str) -> Result<String> {
        let request = self
            .request("GET", &format!("/contents/{}", path))
            .query("ref", &format!("refs/heads/{}", branch));
        let content: Value = self.fetch(request)?;

        content
            .get("sha")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ReleaseError::manifest(format!("{} content not found.", path)))
    }

    fn commit_file(&self, commit: &FileCommit) -> Result<()> {
        let request = self.request("PUT", &format!("/contents/{}", commit.path));
        self.send_ignoring_body(
            request,
            json!({
                "message": commit.message,
                "content": commit.content,
                "sha": commit.sha,
                "branch": commit.branch,
            }),
        )
    }

    fn generate_release_notes(&self, tag_name: &str, target: &str) -> Result<String> {
        let request = self.request("POST", "/releases/generate-notes");
        let notes: NotesDto = self.send(
            request,
            json!({ "tag_name": tag_name, "target_commitish": target }),
        )?;

        Ok(notes.body)
    }

    fn create_pull_request(&self, pull_request: &NewPullRequest) -> Result<Change> {
        let request = self.request("POST", "/pulls");
        let created: PullRequestDto = self.send(
            request,
            json!({
                "title": pull_request.title,
                "head": pull_request.head,
                "base": pull_request.base,
                "body": pull_request.body,
            }),
        )?;

        Ok(created.into())
    }

    fn update_pull_request(&self, number: u64, title: &str, body: &str) -> Result<Change> {
        let request = self.request("PATCH", &format!("/pulls/{}", number));
        let updated: PullRequestDto =
            self.send(request, json!({ "title": title, "body": body }))?;

        Ok(updated.into())
    }

    fn add_labels(&self, number: u64, labels: &[String]) -> Result<()> {
        let request = self.request("POST", &format!("/issues/{}/labels", number));
        self.send_ignoring_body(request, json!({ "labels": labels }))
    }

    fn set_labels(&self, number: u64, labels: &[String]) -> Result<()> {
        let request = self.request("PATCH", &format!("/issues/{}", number));
        self.send_ignoring_body(request, json!({ "labels": labels }))
    }

    fn create_comment(&self, number: u64, body: &str) -> Result<()> {
        let request = self.request("POST", &format!("/issues/{}/comments", number));
        self.send_ignoring_body(request, json!({ "body": body }))
    }

    fn create_tag(&self, tag: &str, message: &str, sha: &str) -> Result<Tag> {
        let request = self.request("POST", "/git/tags");
        let created: TagDto = self.send(
            request,
            json!({ "tag": tag, "message": message, "object": sha, "type": "commit" }),
        )?;

        let request = self.request("POST", "/git/refs");
        self.send_ignoring_body(
            request,
            json!({ "ref": format!("refs/tags/{}", created.tag), "sha": created.sha }),
        )?;

        Ok(Tag {
            tag: created.tag,
            sha: created.sha,
        })
    }

    fn create_release(&self, release: &NewRelease) -> Result<PublishedRelease> {
        let request = self.request("POST", "/releases");
        let created: ReleaseDto = self.send(
            request,
            json!({
                "tag_name": release.tag_name,
                "name": release.name,
                "generate_release_notes": true,
                "prerelease": release.prerelease,
            }),
        )?;

        Ok(PublishedRelease {
            name: created.name.unwrap_or(created.tag_name),
            html_url: created.html_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pull_request_dto_conversion() {
        let dto: PullRequestDto = serde_json::from_str(
            r#"{
                "number": 42,
                "title": "chore(main): release v1.2.0",
                "state": "closed",
                "body": null,
                "labels": [{"name": "release: ready"}, {"name": "type: fix"}],
                "merged_at": "2024-03-01T10:00:00Z",
                "updated_at": "2024-03-01T10:05:00Z",
                "merge_commit_sha": "deadbeef"
            }"#,
        )
        .unwrap();
        let change = Change::from(dto);

        assert_eq!(change.number, 42);
        assert_eq!(change.state, ChangeState::Closed);
        assert!(change.has_label("release: ready"));
        assert!(change.is_merged());
        assert_eq!(change.body, None);
        assert_eq!(change.merge_commit_sha.as_deref(), Some("deadbeef"));
    }

    #[test]
    fn test_open_pull_request_without_optional_fields() {
        let dto: PullRequestDto =
            serde_json::from_str(r#"{"number": 1, "title": "docs", "state": "open"}"#).unwrap();
        let change = Change::from(dto);

        assert_eq!(change.state, ChangeState::Open);
        assert!(change.labels.is_empty());
        assert!(!change.is_merged());
    }

    #[test]
    fn test_url_building() {
        let host = GitHubHost::new(
            "https://api.github.com/",
            "token",
            RepositorySlug::new("octo", "widgets"),
        );
        assert_eq!(
            host.url("/branches/releases/next"),
            "https://api.github.com/repos/octo/widgets/branches/releases/next"
        );
    }
}
