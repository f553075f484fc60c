use std::collections::HashMap;

use super::{CommitPull, CommitRecord, PullRequestInfo, ReleaseInfo, SourceHost, TagInfo};
use crate::error::Result;

/// Mock source host for testing without network access
#[derive(Default)]
pub struct MockHost {
    latest_release: Option<ReleaseInfo>,
    pull_requests: Vec<PullRequestInfo>,
    tags: Vec<TagInfo>,
    commits: Vec<CommitRecord>,
    commit_pulls: HashMap<String, Vec<CommitPull>>,
}

impl MockHost {
    /// Create an empty mock host
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the latest published release
    pub fn set_latest_release(&mut self, tag_name: impl Into<String>, body: impl Into<String>) {
        self.latest_release = Some(ReleaseInfo {
            tag_name: tag_name.into(),
            body: body.into(),
        });
    }

    /// Add a closed pull request (callers add in the order the API would
    /// return them)
    pub fn add_pull_request(&mut self, pull: PullRequestInfo) {
        self.pull_requests.push(pull);
    }

    /// Add a tag pointing at a commit
    pub fn add_tag(&mut self, name: impl Into<String>, commit_sha: impl Into<String>) {
        self.tags.push(TagInfo {
            name: name.into(),
            commit_sha: commit_sha.into(),
        });
    }

    /// Add a commit, most recent first
    pub fn add_commit(&mut self, sha: impl Into<String>, message: impl Into<String>) {
        self.commits.push(CommitRecord {
            sha: sha.into(),
            message: message.into(),
        });
    }

    /// Associate a pull request with a commit
    pub fn add_commit_pull(&mut self, sha: impl Into<String>, pull: CommitPull) {
        self.commit_pulls.entry(sha.into()).or_default().push(pull);
    }
}

impl SourceHost for MockHost {
    async fn latest_release(&self) -> Result<Option<ReleaseInfo>> {
        Ok(self.latest_release.clone())
    }

    async fn closed_pull_requests(&self) -> Result<Vec<PullRequestInfo>> {
        Ok(self.pull_requests.clone())
    }

    async fn tags(&self) -> Result<Vec<TagInfo>> {
        Ok(self.tags.clone())
    }

    async fn commits(&self) -> Result<Vec<CommitRecord>> {
        Ok(self.commits.clone())
    }

    async fn pulls_for_commit(&self, sha: &str) -> Result<Vec<CommitPull>> {
        Ok(self.commit_pulls.get(sha).cloned().unwrap_or_default())
    }
}
