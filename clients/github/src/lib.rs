//! GitHub REST API v3 implementation of [`compat_score::api::Client`].

mod builder;
mod paginator;
mod payload;

pub use builder::{GithubClientBuilder, DEFAULT_GITHUB_URL};

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use compat_score::api::{Commit, Error, PullRequest, RepoListing, Result, SkippedRepo, Step, User};
use log::debug;
use paginator::{last_page, Paginator};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

const FIRST_PAGE_NUMBER: u32 = 1;
const MAX_PAGE_SIZE: u32 = 100;

pub struct GithubClient {
    client: Client,
    github_url: Url,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GithubRepo {
    name: String,
    owner: String,
    language: Option<String>,
    stars: u64,
    forks: u64,
    topics: Vec<String>,
    description: Option<String>,
    updated_at: Option<DateTime<Utc>>,
}

impl GithubRepo {
    pub fn owner(&self) -> &str {
        &self.owner
    }
}

impl compat_score::api::Repo for GithubRepo {
    fn name(&self) -> &str {
        &self.name
    }

    fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    fn stars(&self) -> u64 {
        self.stars
    }

    fn forks(&self) -> u64 {
        self.forks
    }

    fn topics(&self) -> &[String] {
        &self.topics
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl GithubClient {
    /// API URL with `segments` appended to its path.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.github_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Error("API URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn repo_endpoint(&self, repo: &GithubRepo, segments: &[&str]) -> Result<Url> {
        let mut path = vec!["repos", repo.owner.as_str(), repo.name.as_str()];
        path.extend_from_slice(segments);
        self.endpoint(&path)
    }

    async fn get(&self, url: Url, query: &[(&str, String)]) -> Result<Response> {
        debug!("GET {} {:?}", url, query);
        let response = self
            .client
            .get(url.clone())
            .query(query)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;
        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let url = response.url().clone();
        let body = response
            .error_for_status()
            .with_context(|| format!("Request to {} failed", url))?
            .json::<T>()
            .await
            .with_context(|| format!("Unexpected response from {}", url))?;
        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<T> {
        let response = self.get(url, query).await?;
        Self::read_json(response).await
    }

    /// Collects every page of a list endpoint.
    async fn get_all_pages<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<Vec<T>> {
        let mut paginator = Paginator::starting_at(FIRST_PAGE_NUMBER, MAX_PAGE_SIZE);
        let mut items = Vec::new();
        while let Some(page) = paginator.next_page() {
            let mut page_query = query.to_vec();
            page_query.push(("per_page", page.page_size.to_string()));
            page_query.push(("page", page.page_no.to_string()));
            let batch: Vec<T> = self.get_json(url.clone(), &page_query).await?;
            paginator.page_loaded(batch.len());
            items.extend(batch);
        }
        Ok(items)
    }
}

/// Decodes a single repository listing entry, reporting it as skipped when malformed.
fn listed_repo(index: usize, entry: serde_json::Value) -> std::result::Result<GithubRepo, SkippedRepo> {
    let name = entry
        .get("name")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("#{}", index));
    serde_json::from_value::<payload::Repo>(entry)
        .map(GithubRepo::from)
        .map_err(|err| SkippedRepo::new(name, Step::Listing, err.to_string()))
}

#[async_trait]
impl compat_score::api::Client for GithubClient {
    type Repo = GithubRepo;

    async fn user(&self, username: &str) -> Result<User> {
        let response = self.get(self.endpoint(&["users", username])?, &[]).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::UserNotFound(username.to_string()));
        }
        let user: payload::User = Self::read_json(response).await?;
        Ok(user.into())
    }

    async fn repos(&self, username: &str) -> Result<RepoListing<Self::Repo>> {
        let url = self.endpoint(&["users", username, "repos"])?;
        let entries: Vec<serde_json::Value> = self.get_all_pages(url, &[]).await?;
        debug!("Found {} repositories of {}", entries.len(), username);
        Ok(entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| listed_repo(index, entry))
            .collect())
    }

    async fn commit_count(&self, repo: &Self::Repo, author: &str) -> Result<u64> {
        let url = self.repo_endpoint(repo, &["commits"])?;
        let query = [
            ("author", author.to_string()),
            ("per_page", "1".to_string()),
            ("page", FIRST_PAGE_NUMBER.to_string()),
        ];
        let response = self.get(url, &query).await?;
        let last_page = last_page(response.headers());
        let commits: Vec<payload::CommitSummary> = Self::read_json(response).await?;
        Ok(last_page.unwrap_or(commits.len() as u64))
    }

    async fn recent_commits(&self, repo: &Self::Repo, author: &str, limit: u32) -> Result<Vec<Commit>> {
        let url = self.repo_endpoint(repo, &["commits"])?;
        let query = [
            ("author", author.to_string()),
            ("per_page", limit.min(MAX_PAGE_SIZE).to_string()),
            ("page", FIRST_PAGE_NUMBER.to_string()),
        ];
        let commits: Vec<payload::CommitSummary> = self.get_json(url, &query).await?;
        Ok(commits.into_iter().take(limit as usize).map(Commit::from).collect())
    }

    async fn commit_additions(&self, repo: &Self::Repo, sha: &str) -> Result<Option<u64>> {
        let url = self.repo_endpoint(repo, &["commits", sha])?;
        let commit: payload::CommitDetail = self.get_json(url, &[]).await?;
        Ok(commit.stats.map(|stats| stats.additions))
    }

    async fn pull_requests(&self, repo: &Self::Repo) -> Result<Vec<PullRequest>> {
        let url = self.repo_endpoint(repo, &["pulls"])?;
        let pulls: Vec<payload::PullRequest> = self.get_all_pages(url, &[("state", "all".to_string())]).await?;
        Ok(pulls.into_iter().map(PullRequest::from).collect())
    }
}
