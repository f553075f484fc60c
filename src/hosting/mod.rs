//! Source-hosting abstraction layer
//!
//! This module provides a trait-based abstraction over the source-hosting
//! API (releases, pull requests, tags, commits), allowing for a real HTTP
//! implementation and a mock implementation for testing.
//!
//! The record types are deliberately narrow: each carries only the fields
//! the release pipeline reads. Upstream payloads are parsed and validated
//! at this boundary so the core never handles loosely-shaped data.

pub mod github;
pub mod mock;

pub use github::GithubClient;
pub use mock::MockHost;

use chrono::{DateTime, Utc};

use crate::error::Result;

/// The most recent published release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInfo {
    pub tag_name: String,
    pub body: String,
}

/// A closed pull request
///
/// `merged_at` is `None` for pull requests closed without merging; the
/// collector skips those.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestInfo {
    pub title: String,
    pub body: String,
    pub merged_at: Option<DateTime<Utc>>,
    pub branch_name: String,
}

/// A repository tag and the commit it points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub name: String,
    pub commit_sha: String,
}

/// A commit on the default branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub sha: String,
    pub message: String,
}

/// A pull request associated with a specific commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitPull {
    pub title: String,
    pub body: String,
    pub branch_name: String,
}

/// Common source-hosting operations the release pipeline depends on
///
/// Implementations:
///
/// - [GithubClient]: the real implementation against the GitHub REST API
/// - [MockHost]: canned-data implementation for tests
///
/// Fetch failures are hard failures for the run; no retrying happens at
/// this seam.
#[allow(async_fn_in_trait)]
pub trait SourceHost {
    /// The latest published release, or `None` for a repository that has
    /// never cut one
    async fn latest_release(&self) -> Result<Option<ReleaseInfo>>;

    /// Closed pull requests, as returned by the host (single page)
    async fn closed_pull_requests(&self) -> Result<Vec<PullRequestInfo>>;

    /// Repository tags, most recent first
    async fn tags(&self) -> Result<Vec<TagInfo>>;

    /// Commits on the default branch, most recent first
    async fn commits(&self) -> Result<Vec<CommitRecord>>;

    /// Pull requests associated with a commit; empty when the commit was
    /// pushed directly
    async fn pulls_for_commit(&self, sha: &str) -> Result<Vec<CommitPull>>;
}
