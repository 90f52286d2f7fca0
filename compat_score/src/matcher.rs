use crate::activity::{ActivityReport, UserActivity};
use crate::api::Result;
use crate::scoring::{
    normalized_activity_score, relevance_score, validate_max_raw_score, ScoreWeights, DEFAULT_MAX_RAW_SCORE,
};
use derive_more::Constructor;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Constructor)]
pub struct MatchOptions {
    pub weights: ScoreWeights,
    /// Raw activity score mapped to a 100% activity component.
    pub max_raw_score: f64,
}

impl Default for MatchOptions {
    fn default() -> Self {
        MatchOptions::new(ScoreWeights::default(), DEFAULT_MAX_RAW_SCORE)
    }
}

impl MatchOptions {
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        validate_max_raw_score(self.max_raw_score)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompatibilityResult {
    pub username: String,
    pub activity_score_percent: f64,
    pub project_relevance_percent: f64,
    pub admin_compatibility_percent: f64,
    pub final_score_percent: f64,
}

impl CompatibilityResult {
    /// Scores an already aggregated user activity against project and admin topics.
    pub fn from_activity<P, A>(
        username: impl Into<String>,
        activity: &UserActivity,
        project_topics: P,
        admin_topics: A,
        options: &MatchOptions,
    ) -> Result<Self>
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        options.validate()?;
        let activity_score_percent = normalized_activity_score(activity.raw_score(), options.max_raw_score);
        let project_relevance_percent = relevance_score(&activity.topics, project_topics) * 100.0;
        let admin_compatibility_percent = relevance_score(&activity.topics, admin_topics) * 100.0;
        let final_score_percent = options.weights.blend(
            activity_score_percent,
            project_relevance_percent,
            admin_compatibility_percent,
        );
        Ok(CompatibilityResult {
            username: username.into(),
            activity_score_percent,
            project_relevance_percent,
            admin_compatibility_percent,
            final_score_percent,
        })
    }
}

impl Display for CompatibilityResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Scores summary for {}:", self.username)?;
        writeln!(f, "  Activity Score: {:.2}%", self.activity_score_percent)?;
        writeln!(f, "  Project Relevance Score: {:.2}%", self.project_relevance_percent)?;
        writeln!(f, "  Admin Compatibility Score: {:.2}%", self.admin_compatibility_percent)?;
        write!(f, "  Combined Final Score: {:.2}%", self.final_score_percent)
    }
}

/// Compatibility result together with the activity it was computed from.
#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct CompatibilityReport {
    pub result: CompatibilityResult,
    pub activity: ActivityReport,
}

impl Display for CompatibilityReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.result)?;
        if !self.activity.skipped.is_empty() {
            write!(f, "\n\nSkipped repositories:")?;
            for skipped in &self.activity.skipped {
                write!(f, "\n  {}", skipped)?;
            }
        }
        Ok(())
    }
}
