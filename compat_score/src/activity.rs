//! Per user activity aggregate.
//!
//! Every repository of a user contributes commits, sampled lines added, stars, topics and authored
//! pull requests. Contributions are folded into a single [`UserActivity`], whose weighted sum is the
//! unbounded raw score later normalized by [`crate::scoring::normalized_activity_score`].

use crate::api::{Repo, SkippedRepo};
use crate::keywords::extract_keywords;
use derive_more::Constructor;
use std::collections::BTreeSet;

/// Most recent commits per repository inspected for lines added.
pub const MAX_COMMITS_PER_REPO: u32 = 30;

const COMMITS_WEIGHT: f64 = 0.4;
const PULL_REQUESTS_WEIGHT: f64 = 0.3;
const LINES_ADDED_WEIGHT: f64 = 0.2;
const FOLLOWERS_WEIGHT: f64 = 0.05;
const STARS_WEIGHT: f64 = 0.05;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserActivity {
    pub commits: u64,
    pub pull_requests: u64,
    pub lines_added: u64,
    pub followers: u64,
    pub stars: u64,
    /// Union of topics over all repositories, case preserved as collected.
    pub topics: BTreeSet<String>,
}

impl UserActivity {
    pub fn with_followers(followers: u64) -> Self {
        UserActivity {
            followers,
            ..Default::default()
        }
    }

    pub fn raw_score(&self) -> f64 {
        self.commits as f64 * COMMITS_WEIGHT
            + self.pull_requests as f64 * PULL_REQUESTS_WEIGHT
            + self.lines_added as f64 * LINES_ADDED_WEIGHT
            + self.followers as f64 * FOLLOWERS_WEIGHT
            + self.stars as f64 * STARS_WEIGHT
    }

    pub fn add(&mut self, contribution: RepoContribution) {
        self.commits = self.commits.saturating_add(contribution.commits);
        self.pull_requests = self.pull_requests.saturating_add(contribution.pull_requests);
        self.lines_added = self.lines_added.saturating_add(contribution.lines_added);
        self.stars = self.stars.saturating_add(contribution.stars);
        self.topics.extend(contribution.topics);
    }
}

/// What a single repository added to the aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoContribution {
    pub commits: u64,
    pub pull_requests: u64,
    pub lines_added: u64,
    pub stars: u64,
    pub topics: Vec<String>,
}

/// Declared topics of `repo`, or keywords of its description when it declares none.
pub fn repo_topics<R: Repo + ?Sized>(repo: &R) -> Vec<String> {
    if repo.topics().is_empty() {
        extract_keywords(repo.description())
    } else {
        repo.topics().to_vec()
    }
}

/// Result of processing one repository.
///
/// A skipped repository still carries whatever it contributed before the failing step.
#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct RepoOutcome {
    pub repo: String,
    pub contribution: RepoContribution,
    pub skipped: Option<SkippedRepo>,
}

impl RepoOutcome {
    pub fn skipped(skipped: SkippedRepo) -> Self {
        RepoOutcome::new(skipped.repo.clone(), RepoContribution::default(), Some(skipped))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityReport {
    pub username: String,
    pub activity: UserActivity,
    /// Repositories processed without any failure.
    pub scanned: Vec<String>,
    pub skipped: Vec<SkippedRepo>,
}

impl ActivityReport {
    pub fn new(username: String, followers: u64) -> Self {
        ActivityReport {
            username,
            activity: UserActivity::with_followers(followers),
            scanned: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn add(&mut self, outcome: RepoOutcome) {
        self.activity.add(outcome.contribution);
        match outcome.skipped {
            Some(skipped) => self.skipped.push(skipped),
            None => self.scanned.push(outcome.repo),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Step;
    use chrono::{DateTime, Utc};

    struct TestRepo {
        topics: Vec<String>,
        description: Option<String>,
    }

    impl Repo for TestRepo {
        fn name(&self) -> &str {
            "test"
        }
        fn language(&self) -> Option<&str> {
            None
        }
        fn stars(&self) -> u64 {
            0
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
        fn updated_at(&self) -> Option<DateTime<Utc>> {
            None
        }
    }

    #[test]
    fn raw_score_weights_test() {
        let activity = UserActivity {
            commits: 100,
            pull_requests: 10,
            lines_added: 1000,
            followers: 20,
            stars: 40,
            topics: BTreeSet::new(),
        };
        // 40 + 3 + 200 + 1 + 2
        assert!((activity.raw_score() - 246.0).abs() < 1e-9);
        assert_eq!(UserActivity::default().raw_score(), 0.0);
    }

    #[test]
    fn totals_saturate_test() {
        let mut activity = UserActivity::default();
        for _ in 0..2 {
            activity.add(RepoContribution {
                commits: u64::MAX,
                pull_requests: u64::MAX,
                lines_added: u64::MAX,
                stars: u64::MAX,
                topics: Vec::new(),
            });
        }
        assert_eq!(activity.commits, u64::MAX);
        assert_eq!(activity.pull_requests, u64::MAX);
        assert_eq!(activity.lines_added, u64::MAX);
        assert_eq!(activity.stars, u64::MAX);
    }

    #[test]
    fn topics_union_test() {
        let mut activity = UserActivity::default();
        activity.add(RepoContribution {
            topics: vec!["rust".to_string(), "cli".to_string()],
            ..Default::default()
        });
        activity.add(RepoContribution {
            topics: vec!["cli".to_string(), "Rust".to_string()],
            ..Default::default()
        });
        let topics: Vec<&str> = activity.topics.iter().map(String::as_str).collect();
        assert_eq!(topics, vec!["Rust", "cli", "rust"]);
    }

    #[test]
    fn repo_topics_fallback_test() {
        let declared = TestRepo {
            topics: vec!["machine-learning".to_string()],
            description: Some("Ignored description".to_string()),
        };
        assert_eq!(repo_topics(&declared), vec!["machine-learning"]);

        let described = TestRepo {
            topics: Vec::new(),
            description: Some("Parser for the TOML format".to_string()),
        };
        assert_eq!(repo_topics(&described), vec!["parser", "toml", "format"]);

        let bare = TestRepo {
            topics: Vec::new(),
            description: None,
        };
        assert!(repo_topics(&bare).is_empty());
    }

    #[test]
    fn report_keeps_partial_contribution_test() {
        let mut report = ActivityReport::new("octocat".to_string(), 3);
        report.add(RepoOutcome::new(
            "complete".to_string(),
            RepoContribution {
                commits: 5,
                pull_requests: 1,
                ..Default::default()
            },
            None,
        ));
        report.add(RepoOutcome::new(
            "partial".to_string(),
            RepoContribution {
                commits: 2,
                ..Default::default()
            },
            Some(SkippedRepo::new("partial".to_string(), Step::PullRequests, "boom".to_string())),
        ));
        report.add(RepoOutcome::skipped(SkippedRepo::new(
            "broken".to_string(),
            Step::Listing,
            "missing field".to_string(),
        )));

        assert_eq!(report.activity.commits, 7);
        assert_eq!(report.activity.pull_requests, 1);
        assert_eq!(report.activity.followers, 3);
        assert_eq!(report.scanned, vec!["complete"]);
        let skipped: Vec<&str> = report.skipped.iter().map(|skipped| skipped.repo.as_str()).collect();
        assert_eq!(skipped, vec!["partial", "broken"]);
    }
}
