use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct User {
    pub login: String,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    #[serde(default)]
    pub public_repos: u64,
}

impl From<User> for compat_score::api::User {
    fn from(user: User) -> Self {
        compat_score::api::User::new(user.login, user.followers, user.following, user.public_repos)
    }
}

#[derive(Deserialize, Debug)]
pub struct Repo {
    pub name: String,
    pub owner: Login,
    pub language: Option<String>,
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub topics: Vec<String>,
    pub description: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Repo> for crate::GithubRepo {
    fn from(repo: Repo) -> Self {
        crate::GithubRepo {
            name: repo.name,
            owner: repo.owner.login,
            language: repo.language,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            topics: repo.topics,
            description: repo.description,
            updated_at: repo.updated_at,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct Login {
    pub login: String,
}

#[derive(Deserialize, Debug)]
pub struct CommitSummary {
    pub sha: String,
}

impl From<CommitSummary> for compat_score::api::Commit {
    fn from(commit: CommitSummary) -> Self {
        compat_score::api::Commit::new(commit.sha)
    }
}

#[derive(Deserialize, Debug)]
pub struct CommitDetail {
    pub stats: Option<CommitStats>,
}

#[derive(Deserialize, Debug)]
pub struct CommitStats {
    pub additions: u64,
}

#[derive(Deserialize, Debug)]
pub struct PullRequest {
    pub number: u64,
    pub user: Option<Login>,
}

impl From<PullRequest> for compat_score::api::PullRequest {
    fn from(pull: PullRequest) -> Self {
        compat_score::api::PullRequest::new(pull.number, pull.user.map(|user| user.login))
    }
}
