use crate::activity::{repo_topics, ActivityReport, RepoContribution, RepoOutcome, MAX_COMMITS_PER_REPO};
use crate::api::{Client, Error, Repo, Result, SkippedRepo, Step, User};
use crate::languages::{rank_languages, TopLanguages, TOP_LANGUAGES_COUNT};
use crate::matcher::{CompatibilityReport, CompatibilityResult, MatchOptions};
use crate::profile::{profile_score, ProfileScore};
use chrono::Utc;
use futures::{future, stream, StreamExt};
use log::{debug, info, warn};
use std::sync::Arc;

/// Runs the scoring pipelines against a code hosting `CLIENT`.
///
/// Repositories are processed one after another. A failure inside a single repository never aborts
/// a pipeline, only a failed user lookup or repository listing does.
pub struct Scorer<CLIENT>
where
    CLIENT: Client,
{
    client: Arc<CLIENT>,
}

impl<CLIENT> Clone for Scorer<CLIENT>
where
    CLIENT: Client,
{
    fn clone(&self) -> Self {
        Scorer {
            client: self.client.clone(),
        }
    }
}

impl<CLIENT> Scorer<CLIENT>
where
    CLIENT: Client,
{
    pub fn new(client: CLIENT) -> Self {
        Scorer {
            client: Arc::new(client),
        }
    }

    /// Top languages of `username` by number of repositories.
    pub async fn top_languages(&self, username: &str) -> Result<TopLanguages> {
        let user = self.client.user(username).await?;
        let (repos, skipped) = self.listed_repos(&user).await?;
        let languages = rank_languages(repos.iter().map(Repo::language), TOP_LANGUAGES_COUNT);
        info!("Ranked languages of {} over {} repositories", user.login, repos.len());
        Ok(TopLanguages::new(username.to_string(), languages, skipped))
    }

    /// Aggregates the activity of `username` over all of their repositories.
    pub async fn user_activity(&self, username: &str) -> Result<ActivityReport> {
        let user = self.client.user(username).await?;
        let listing = self.client.repos(&user.login).await?;
        let author = user.login.as_str();
        let report = stream::iter(listing)
            .then(|repo| async move {
                match repo {
                    Ok(repo) => self.repo_outcome(&repo, author).await,
                    Err(skipped) => RepoOutcome::skipped(skipped),
                }
            })
            .fold(ActivityReport::new(username.to_string(), user.followers), |mut report, outcome| {
                if let Some(skipped) = &outcome.skipped {
                    warn!("Skipping repository {}", skipped);
                }
                report.add(outcome);
                future::ready(report)
            })
            .await;
        info!(
            "Aggregated {} repositories of {} ({} skipped)",
            report.scanned.len() + report.skipped.len(),
            user.login,
            report.skipped.len()
        );
        Ok(report)
    }

    /// Blends activity, project relevance and admin compatibility of `username`.
    pub async fn combined_matching_score(
        &self,
        username: &str,
        project_topics: &[String],
        admin_topics: &[String],
        options: &MatchOptions,
    ) -> Result<CompatibilityReport> {
        options.validate()?;
        let activity = self.user_activity(username).await?;
        let result =
            CompatibilityResult::from_activity(username, &activity.activity, project_topics, admin_topics, options)?;
        Ok(CompatibilityReport::new(result, activity))
    }

    /// Profile score of `username` computed from listing data only.
    pub async fn profile_score(&self, username: &str) -> Result<ProfileScore> {
        let user = self.client.user(username).await?;
        let (repos, skipped) = self.listed_repos(&user).await?;
        let mut score = profile_score(username, &user, &repos, Utc::now());
        score.skipped = skipped;
        Ok(score)
    }

    async fn listed_repos(&self, user: &User) -> Result<(Vec<CLIENT::Repo>, Vec<SkippedRepo>)> {
        let mut repos = Vec::new();
        let mut skipped = Vec::new();
        for repo in self.client.repos(&user.login).await? {
            match repo {
                Ok(repo) => repos.push(repo),
                Err(err) => {
                    warn!("Skipping repository {}", err);
                    skipped.push(err);
                }
            }
        }
        Ok((repos, skipped))
    }

    async fn repo_outcome(&self, repo: &CLIENT::Repo, author: &str) -> RepoOutcome {
        let mut contribution = RepoContribution::default();
        let skipped = self
            .collect_contribution(repo, author, &mut contribution)
            .await
            .err()
            .map(|(step, err)| SkippedRepo::new(repo.name().to_string(), step, format!("{:#}", err)));
        RepoOutcome::new(repo.name().to_string(), contribution, skipped)
    }

    /// Fills `contribution` step by step, stopping at the first failing step.
    async fn collect_contribution(
        &self,
        repo: &CLIENT::Repo,
        author: &str,
        contribution: &mut RepoContribution,
    ) -> std::result::Result<(), (Step, Error)> {
        contribution.commits = self
            .client
            .commit_count(repo, author)
            .await
            .map_err(|err| (Step::Commits, err))?;

        let commits = self
            .client
            .recent_commits(repo, author, MAX_COMMITS_PER_REPO)
            .await
            .map_err(|err| (Step::Lines, err))?;
        let mut lines_added: u64 = 0;
        for commit in commits.iter().take(MAX_COMMITS_PER_REPO as usize) {
            match self.client.commit_additions(repo, &commit.sha).await {
                Ok(Some(additions)) => lines_added = lines_added.saturating_add(additions),
                Ok(None) => debug!("No stats for commit {} of {}", commit.sha, repo.name()),
                Err(err) => debug!("Failed to get stats for commit {} of {}: {}", commit.sha, repo.name(), err),
            }
        }
        contribution.lines_added = lines_added;

        contribution.stars = repo.stars();
        contribution.topics = repo_topics(repo);

        let pulls = self
            .client
            .pull_requests(repo)
            .await
            .map_err(|err| (Step::PullRequests, err))?;
        contribution.pull_requests = pulls
            .iter()
            .filter(|pull| pull.author.as_deref().map_or(false, |login| login.eq_ignore_ascii_case(author)))
            .count() as u64;
        debug!("Repository {} contributed {:?}", repo.name(), contribution);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Commit, PullRequest, RepoListing};
    use async_trait::async_trait;
    use chrono::DateTime;
    use std::collections::{HashMap, HashSet};

    #[derive(Clone)]
    struct MockRepo {
        name: String,
        language: Option<String>,
        stars: u64,
        topics: Vec<String>,
        description: Option<String>,
    }

    impl MockRepo {
        fn new(name: &str, language: Option<&str>, stars: u64) -> Self {
            MockRepo {
                name: name.to_string(),
                language: language.map(str::to_string),
                stars,
                topics: Vec::new(),
                description: None,
            }
        }

        fn with_topics(mut self, topics: &[&str]) -> Self {
            self.topics = topics.iter().map(|topic| topic.to_string()).collect();
            self
        }

        fn with_description(mut self, description: &str) -> Self {
            self.description = Some(description.to_string());
            self
        }
    }

    impl Repo for MockRepo {
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
            0
        }
        fn topics(&self) -> &[String] {
            &self.topics
        }
        fn description(&self) -> Option<&str> {
            self.description.as_deref()
        }
        fn updated_at(&self) -> Option<DateTime<chrono::Utc>> {
            None
        }
    }

    /// Per repository canned data, keyed by repository name.
    #[derive(Default)]
    struct MockClient {
        user: Option<User>,
        repos: Vec<MockRepo>,
        broken_listing: Vec<String>,
        commit_counts: HashMap<String, u64>,
        commits: HashMap<String, Vec<Commit>>,
        additions: HashMap<String, Option<u64>>,
        pulls: HashMap<String, Vec<PullRequest>>,
        failing: HashMap<String, Step>,
    }

    impl MockClient {
        fn fail_at(&self, repo: &MockRepo, step: Step) -> Result<()> {
            if self.failing.get(&repo.name) == Some(&step) {
                return Err(Error::Error("Mocked failure"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl Client for MockClient {
        type Repo = MockRepo;

        async fn user(&self, username: &str) -> Result<User> {
            self.user
                .clone()
                .filter(|user| user.login.eq_ignore_ascii_case(username))
                .ok_or_else(|| Error::UserNotFound(username.to_string()))
        }

        async fn repos(&self, _username: &str) -> Result<RepoListing<MockRepo>> {
            let mut listing: RepoListing<MockRepo> = self.repos.iter().cloned().map(Ok).collect();
            for name in &self.broken_listing {
                listing.push(Err(SkippedRepo::new(
                    name.clone(),
                    Step::Listing,
                    "missing field `owner`".to_string(),
                )));
            }
            Ok(listing)
        }

        async fn commit_count(&self, repo: &MockRepo, _author: &str) -> Result<u64> {
            self.fail_at(repo, Step::Commits)?;
            Ok(self.commit_counts.get(&repo.name).copied().unwrap_or(0))
        }

        async fn recent_commits(&self, repo: &MockRepo, _author: &str, limit: u32) -> Result<Vec<Commit>> {
            self.fail_at(repo, Step::Lines)?;
            let commits = self.commits.get(&repo.name).cloned().unwrap_or_default();
            Ok(commits.into_iter().take(limit as usize).collect())
        }

        async fn commit_additions(&self, _repo: &MockRepo, sha: &str) -> Result<Option<u64>> {
            match self.additions.get(sha) {
                Some(additions) => Ok(*additions),
                None => Err(Error::Error("Unknown commit")),
            }
        }

        async fn pull_requests(&self, repo: &MockRepo) -> Result<Vec<PullRequest>> {
            self.fail_at(repo, Step::PullRequests)?;
            Ok(self.pulls.get(&repo.name).cloned().unwrap_or_default())
        }
    }

    fn commits(prefix: &str, count: usize) -> Vec<Commit> {
        (0..count).map(|i| Commit::new(format!("{}{}", prefix, i))).collect()
    }

    fn three_repo_client() -> MockClient {
        let mut client = MockClient {
            user: Some(User::new("Octocat".to_string(), 10, 1, 3)),
            repos: vec![
                MockRepo::new("alpha", Some("Rust"), 5).with_topics(&["rust", "cli"]),
                MockRepo::new("beta", Some("Python"), 100).with_topics(&["python"]),
                MockRepo::new("gamma", None, 1).with_description("An HTTP api for the web"),
            ],
            ..Default::default()
        };
        client.commit_counts.insert("alpha".to_string(), 40);
        client.commit_counts.insert("beta".to_string(), 7);
        client.commit_counts.insert("gamma".to_string(), 3);
        client.commits.insert("alpha".to_string(), commits("a", 2));
        client.commits.insert("gamma".to_string(), commits("g", 1));
        client.additions.insert("a0".to_string(), Some(10));
        client.additions.insert("a1".to_string(), None);
        client.additions.insert("g0".to_string(), Some(5));
        client.pulls.insert(
            "alpha".to_string(),
            vec![
                PullRequest::new(1, Some("octocat".to_string())),
                PullRequest::new(2, Some("someone".to_string())),
                PullRequest::new(3, None),
            ],
        );
        client
            .pulls
            .insert("gamma".to_string(), vec![PullRequest::new(4, Some("Octocat".to_string()))]);
        client
    }

    #[tokio::test]
    async fn activity_all_repos_test() {
        let scorer = Scorer::new(three_repo_client());
        let report = scorer.user_activity("octocat").await.unwrap();
        let activity = &report.activity;
        assert_eq!(activity.commits, 50);
        assert_eq!(activity.lines_added, 15);
        assert_eq!(activity.stars, 106);
        assert_eq!(activity.pull_requests, 2);
        assert_eq!(activity.followers, 10);
        let topics: HashSet<&str> = activity.topics.iter().map(String::as_str).collect();
        assert_eq!(topics, HashSet::from(["rust", "cli", "python", "http", "api", "web"]));
        assert_eq!(report.scanned, vec!["alpha", "beta", "gamma"]);
        assert!(report.skipped.is_empty());
    }

    #[tokio::test]
    async fn activity_skip_and_continue_test() {
        let mut client = three_repo_client();
        client.failing.insert("beta".to_string(), Step::Commits);
        let report = Scorer::new(client).user_activity("octocat").await.unwrap();
        let activity = &report.activity;
        assert_eq!(activity.commits, 43);
        assert_eq!(activity.stars, 6);
        assert_eq!(activity.lines_added, 15);
        assert_eq!(activity.pull_requests, 2);
        assert!(!activity.topics.contains("python"));
        assert_eq!(report.scanned, vec!["alpha", "gamma"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].repo, "beta");
        assert_eq!(report.skipped[0].step, Step::Commits);
        assert!(report.skipped[0].reason.contains("Mocked failure"));
    }

    #[tokio::test]
    async fn activity_partial_credit_test() {
        let mut client = three_repo_client();
        client.failing.insert("alpha".to_string(), Step::PullRequests);
        client.failing.insert("gamma".to_string(), Step::Lines);
        let report = Scorer::new(client).user_activity("octocat").await.unwrap();
        let activity = &report.activity;
        // alpha keeps commits, lines, stars and topics; gamma keeps commits only
        assert_eq!(activity.commits, 50);
        assert_eq!(activity.lines_added, 10);
        assert_eq!(activity.stars, 105);
        assert_eq!(activity.pull_requests, 0);
        assert!(activity.topics.contains("cli"));
        assert!(!activity.topics.contains("web"));
        let steps: Vec<(&str, Step)> = report
            .skipped
            .iter()
            .map(|skipped| (skipped.repo.as_str(), skipped.step))
            .collect();
        assert_eq!(steps, vec![("alpha", Step::PullRequests), ("gamma", Step::Lines)]);
    }

    #[tokio::test]
    async fn activity_commit_sample_capped_test() {
        let mut client = MockClient {
            user: Some(User::new("octocat".to_string(), 0, 0, 1)),
            repos: vec![MockRepo::new("big", Some("C"), 0)],
            ..Default::default()
        };
        let sample = commits("c", 45);
        for commit in &sample {
            client.additions.insert(commit.sha.clone(), Some(1));
        }
        client.commits.insert("big".to_string(), sample);
        client.commit_counts.insert("big".to_string(), 45);
        let report = Scorer::new(client).user_activity("octocat").await.unwrap();
        assert_eq!(report.activity.commits, 45);
        assert_eq!(report.activity.lines_added, MAX_COMMITS_PER_REPO as u64);
    }

    #[tokio::test]
    async fn activity_listing_failure_reported_test() {
        let mut client = three_repo_client();
        client.broken_listing.push("delta".to_string());
        let report = Scorer::new(client).user_activity("octocat").await.unwrap();
        assert_eq!(report.scanned.len(), 3);
        assert_eq!(report.skipped[0].step, Step::Listing);
    }

    #[tokio::test]
    async fn unknown_user_test() {
        let scorer = Scorer::new(three_repo_client());
        let result = scorer.user_activity("ghost").await;
        assert!(matches!(result, Err(Error::UserNotFound(name)) if name == "ghost"));
        assert!(scorer.top_languages("ghost").await.is_err());
    }

    #[tokio::test]
    async fn top_languages_test() {
        let mut client = three_repo_client();
        client.repos.push(MockRepo::new("delta", Some("Rust"), 0));
        client.repos.push(MockRepo::new("epsilon", Some("Go"), 0));
        client.repos.push(MockRepo::new("zeta", Some("Ada"), 0));
        client.broken_listing.push("eta".to_string());
        let top = Scorer::new(client).top_languages("octocat").await.unwrap();
        assert_eq!(top.names(), vec!["Rust", "Ada", "Go"]);
        assert_eq!(top.skipped.len(), 1);
    }

    #[tokio::test]
    async fn combined_matching_score_test() {
        let scorer = Scorer::new(three_repo_client());
        let project = vec!["Rust".to_string(), "wasm".to_string()];
        let admin = vec!["python".to_string(), "api".to_string(), "web".to_string()];
        let report = scorer
            .combined_matching_score("octocat", &project, &admin, &MatchOptions::default())
            .await
            .unwrap();
        let result = &report.result;
        // topics: rust, cli, python, http, api, web
        assert!((result.project_relevance_percent - 100.0 / 7.0).abs() < 1e-9);
        assert!((result.admin_compatibility_percent - 50.0).abs() < 1e-9);
        assert!(result.activity_score_percent > 0.0 && result.activity_score_percent < 100.0);
        let expected = 0.6 * result.activity_score_percent
            + 0.2 * result.project_relevance_percent
            + 0.2 * result.admin_compatibility_percent;
        assert!((result.final_score_percent - expected).abs() < 1e-9);
        assert!((0.0..=100.0).contains(&result.final_score_percent));
    }

    #[tokio::test]
    async fn profile_score_test() {
        let score = Scorer::new(three_repo_client()).profile_score("octocat").await.unwrap();
        assert_eq!(score.username, "octocat");
        assert_eq!(score.metrics.total_stars, 106);
        assert_eq!(score.metrics.languages, vec!["Rust", "Python"]);
    }
}
