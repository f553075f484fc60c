use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{ReleasePilotError, Result};

use super::{CommitPull, CommitRecord, PullRequestInfo, ReleaseInfo, SourceHost, TagInfo};

const GITHUB_API_BASE_URL: &str = "https://api.github.com";
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Source-hosting implementation against the GitHub REST API
///
/// Fetches are single-page, matching the established release process: the
/// window between two releases is expected to fit in one API page.
pub struct GithubClient {
    client: Client,
    base_url: String,
    owner: String,
    repo: String,
}

// Wire payloads: only the fields the pipeline reads are deserialized.

#[derive(Deserialize)]
struct ReleasePayload {
    tag_name: String,
    body: Option<String>,
}

#[derive(Deserialize)]
struct PullPayload {
    title: String,
    body: Option<String>,
    merged_at: Option<DateTime<Utc>>,
    head: HeadPayload,
}

#[derive(Deserialize)]
struct HeadPayload {
    #[serde(rename = "ref")]
    branch: String,
}

#[derive(Deserialize)]
struct TagPayload {
    name: String,
    commit: TagCommitPayload,
}

#[derive(Deserialize)]
struct TagCommitPayload {
    sha: String,
}

#[derive(Deserialize)]
struct CommitPayload {
    sha: String,
    commit: CommitDetailPayload,
}

#[derive(Deserialize)]
struct CommitDetailPayload {
    message: String,
}

impl GithubClient {
    /// Create a client for a repository, authenticating with the given
    /// API token
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, token: &str) -> Result<Self> {
        Self::with_base_url(owner, repo, token, GITHUB_API_BASE_URL)
    }

    /// Create a client against a non-default API base URL
    pub fn with_base_url(
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: &str,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("release-pilot"));
        let auth = HeaderValue::from_str(&format!("token {}", token))
            .map_err(|_| ReleasePilotError::config("source-hosting token is not a valid header value"))?;
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder().default_headers(headers).build()?;

        Ok(GithubClient {
            client,
            base_url: base_url.into(),
            owner: owner.into(),
            repo: repo.into(),
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.base_url, self.owner, self.repo, path
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, operation: &str, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let reason = response.text().await.unwrap_or_default();
            return Err(ReleasePilotError::api(
                operation,
                Some(status.as_u16()),
                reason,
            ));
        }

        Ok(response.json().await?)
    }
}

impl SourceHost for GithubClient {
    async fn latest_release(&self) -> Result<Option<ReleaseInfo>> {
        let url = self.repo_url("releases/latest");
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        // A repository with no releases yet answers 404; that is a fresh
        // start, not a failure.
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let reason = response.text().await.unwrap_or_default();
            return Err(ReleasePilotError::api(
                "fetch latest release",
                Some(status.as_u16()),
                reason,
            ));
        }

        let payload: ReleasePayload = response.json().await?;
        Ok(Some(ReleaseInfo {
            tag_name: payload.tag_name,
            body: payload.body.unwrap_or_default(),
        }))
    }

    async fn closed_pull_requests(&self) -> Result<Vec<PullRequestInfo>> {
        let url = self.repo_url("pulls?state=closed");
        let payloads: Vec<PullPayload> = self.get_json("list closed pull requests", &url).await?;

        Ok(payloads
            .into_iter()
            .map(|p| PullRequestInfo {
                title: p.title,
                body: p.body.unwrap_or_default(),
                merged_at: p.merged_at,
                branch_name: p.head.branch,
            })
            .collect())
    }

    async fn tags(&self) -> Result<Vec<TagInfo>> {
        let url = self.repo_url("tags");
        let payloads: Vec<TagPayload> = self.get_json("list tags", &url).await?;

        Ok(payloads
            .into_iter()
            .map(|t| TagInfo {
                name: t.name,
                commit_sha: t.commit.sha,
            })
            .collect())
    }

    async fn commits(&self) -> Result<Vec<CommitRecord>> {
        let url = self.repo_url("commits");
        let payloads: Vec<CommitPayload> = self.get_json("list commits", &url).await?;

        Ok(payloads
            .into_iter()
            .map(|c| CommitRecord {
                sha: c.sha,
                message: c.commit.message,
            })
            .collect())
    }

    async fn pulls_for_commit(&self, sha: &str) -> Result<Vec<CommitPull>> {
        let url = self.repo_url(&format!("commits/{}/pulls", sha));
        let payloads: Vec<PullPayload> = self
            .get_json("list pull requests for commit", &url)
            .await?;

        Ok(payloads
            .into_iter()
            .map(|p| CommitPull {
                title: p.title,
                body: p.body.unwrap_or_default(),
                branch_name: p.head.branch,
            })
            .collect())
    }
}
