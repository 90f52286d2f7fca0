use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_more::Constructor;
use strum_macros::Display;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Error: {0}")]
    Error(&'static str),
    #[error("User {0} not found")]
    UserNotFound(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Repository metadata available straight from a user's repository listing.
pub trait Repo: Send + Sync {
    fn name(&self) -> &str;

    /// Primary language detected by the hosting service.
    fn language(&self) -> Option<&str>;

    fn stars(&self) -> u64;

    fn forks(&self) -> u64;

    /// Declared topics, empty when the repository has none.
    fn topics(&self) -> &[String];

    fn description(&self) -> Option<&str>;

    fn updated_at(&self) -> Option<DateTime<Utc>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct User {
    /// Canonical login, which may differ in case from the looked up name.
    pub login: String,
    pub followers: u64,
    pub following: u64,
    pub public_repos: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct Commit {
    pub sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct PullRequest {
    pub number: u64,
    pub author: Option<String>,
}

/// Stage of repository processing at which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Step {
    Listing,
    Commits,
    Lines,
    PullRequests,
}

/// A repository which could not be processed completely.
#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct SkippedRepo {
    pub repo: String,
    pub step: Step,
    pub reason: String,
}

impl std::fmt::Display for SkippedRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (at {}): {}", self.repo, self.step, self.reason)
    }
}

/// Repository listing where entries that failed to decode are reported instead of dropped.
pub type RepoListing<REPO> = Vec<std::result::Result<REPO, SkippedRepo>>;

/// Code hosting API consumed by the scorer.
///
/// Implementations own pagination, authentication and transport concerns.
#[async_trait]
pub trait Client: Send + Sync {
    type Repo: Repo;

    /// Looks up a user, failing with `Error::UserNotFound` for unknown names.
    async fn user(&self, username: &str) -> Result<User>;

    /// Lists every repository owned by `username`.
    async fn repos(&self, username: &str) -> Result<RepoListing<Self::Repo>>;

    /// Total number of commits in `repo` authored by `author`.
    async fn commit_count(&self, repo: &Self::Repo, author: &str) -> Result<u64>;

    /// At most `limit` most recent commits in `repo` authored by `author`.
    async fn recent_commits(&self, repo: &Self::Repo, author: &str, limit: u32) -> Result<Vec<Commit>>;

    /// Lines added by a single commit, `None` when the service has no stats for it.
    async fn commit_additions(&self, repo: &Self::Repo, sha: &str) -> Result<Option<u64>>;

    /// Pull requests of `repo` in any state.
    async fn pull_requests(&self, repo: &Self::Repo) -> Result<Vec<PullRequest>>;
}
