//! Profile score built from user and repository listing data only.
//!
//! Unlike the activity score it needs no per repository requests, so it is cheap enough to compute
//! for many users. Each component is capped and the capped components sum up to at most 100.

use crate::api::{Repo, SkippedRepo, User};
use chrono::{DateTime, Months, Utc};
use std::fmt::Display;

const REPOSITORY_COUNT_CAP: f64 = 30.0;
const FOLLOWERS_CAP: f64 = 20.0;
const STARS_CAP: f64 = 25.0;
const ACTIVITY_CAP: f64 = 15.0;
const LANGUAGE_DIVERSITY_CAP: f64 = 10.0;

/// Months since the last update for a repository to count as recent.
const RECENT_MONTHS: u32 = 6;
const LISTED_LANGUAGES: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileBreakdown {
    pub repository_count: f64,
    pub followers: f64,
    pub stars: f64,
    pub activity: f64,
    pub language_diversity: f64,
}

impl ProfileBreakdown {
    fn total(&self) -> f64 {
        self.repository_count + self.followers + self.stars + self.activity + self.language_diversity
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileMetrics {
    pub public_repos: u64,
    pub followers: u64,
    pub following: u64,
    pub total_stars: u64,
    pub total_forks: u64,
    /// First distinct languages in listing order.
    pub languages: Vec<String>,
    pub recent_repos: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileScore {
    pub username: String,
    pub total_score: u32,
    pub breakdown: ProfileBreakdown,
    pub metrics: ProfileMetrics,
    pub skipped: Vec<SkippedRepo>,
}

/// Scores `user` as looked up under `username` from its listed `repos`.
pub fn profile_score<R: Repo>(username: &str, user: &User, repos: &[R], now: DateTime<Utc>) -> ProfileScore {
    let recent_since = now.checked_sub_months(Months::new(RECENT_MONTHS)).unwrap_or(now);
    let total_stars = repos.iter().map(Repo::stars).fold(0u64, u64::saturating_add);
    let total_forks = repos.iter().map(Repo::forks).fold(0u64, u64::saturating_add);
    let recent_repos = repos
        .iter()
        .filter(|repo| repo.updated_at().map_or(false, |updated| updated > recent_since))
        .count() as u64;
    let mut languages: Vec<String> = Vec::new();
    for language in repos.iter().filter_map(Repo::language) {
        if !language.is_empty() && !languages.iter().any(|known| known == language) {
            languages.push(language.to_string());
        }
    }

    let breakdown = ProfileBreakdown {
        repository_count: (user.public_repos as f64 * 2.0).min(REPOSITORY_COUNT_CAP),
        followers: (user.followers as f64 * 0.5).min(FOLLOWERS_CAP),
        stars: (total_stars as f64 * 0.1).min(STARS_CAP),
        activity: (recent_repos as f64 * 3.0).min(ACTIVITY_CAP),
        language_diversity: (languages.len() as f64 * 2.0).min(LANGUAGE_DIVERSITY_CAP),
    };
    let total_score = breakdown.total().round().min(100.0) as u32;
    languages.truncate(LISTED_LANGUAGES);

    ProfileScore {
        username: username.to_string(),
        total_score,
        breakdown,
        metrics: ProfileMetrics {
            public_repos: user.public_repos,
            followers: user.followers,
            following: user.following,
            total_stars,
            total_forks,
            languages,
            recent_repos,
        },
        skipped: Vec::new(),
    }
}

impl Display for ProfileScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Profile score for {}: {}/100", self.username, self.total_score)?;
        writeln!(
            f,
            "  Repositories: {:.1} ({} public)",
            self.breakdown.repository_count, self.metrics.public_repos
        )?;
        writeln!(
            f,
            "  Followers: {:.1} ({} followers)",
            self.breakdown.followers, self.metrics.followers
        )?;
        writeln!(f, "  Stars: {:.1} ({} stars)", self.breakdown.stars, self.metrics.total_stars)?;
        writeln!(
            f,
            "  Activity: {:.1} ({} recently updated)",
            self.breakdown.activity, self.metrics.recent_repos
        )?;
        write!(
            f,
            "  Language diversity: {:.1} ({:?})",
            self.breakdown.language_diversity, self.metrics.languages
        )
    }
}
