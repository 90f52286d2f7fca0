//! Score normalization, topic relevance and blending.

use crate::api::{Error, Result};
use derive_more::Constructor;
use std::collections::HashSet;

/// Raw activity score mapped to 100%.
pub const DEFAULT_MAX_RAW_SCORE: f64 = 1_000_000.0;

/// Smallest accepted `max_raw_score`, keeping the normalization denominator well away from zero.
pub const MIN_MAX_RAW_SCORE: f64 = 1.0;

/// Blend weights of the three compatibility components.
#[derive(Debug, Clone, Copy, PartialEq, Constructor)]
pub struct ScoreWeights {
    pub activity: f64,
    pub project_relevance: f64,
    pub admin_compatibility: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights::new(0.6, 0.2, 0.2)
    }
}

impl ScoreWeights {
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("activity", self.activity),
            ("project_relevance", self.project_relevance),
            ("admin_compatibility", self.admin_compatibility),
        ];
        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::InvalidArgument(format!(
                    "{} weight {} is not a non-negative number.",
                    name, weight
                )));
            }
        }
        Ok(())
    }

    /// Blends component percentages into a final percentage clamped to [0, 100].
    pub fn blend(&self, activity_percent: f64, project_percent: f64, admin_percent: f64) -> f64 {
        let score = self.activity * activity_percent
            + self.project_relevance * project_percent
            + self.admin_compatibility * admin_percent;
        if score.is_nan() {
            return 0.0;
        }
        score.clamp(0.0, 100.0)
    }
}

pub fn validate_max_raw_score(max_raw_score: f64) -> Result<()> {
    if !max_raw_score.is_finite() || max_raw_score < MIN_MAX_RAW_SCORE {
        return Err(Error::InvalidArgument(format!(
            "max raw score {} is not a finite number of at least {}.",
            max_raw_score, MIN_MAX_RAW_SCORE
        )));
    }
    Ok(())
}

/// Maps an unbounded raw score onto [0, 100] with a logarithmic curve.
///
/// `max_raw_score` is the raw score reaching 100%. Anything above it is capped. Ceilings below
/// [`MIN_MAX_RAW_SCORE`] are raised to it, so the result is always within [0, 100].
pub fn normalized_activity_score(raw_score: f64, max_raw_score: f64) -> f64 {
    let raw_score = raw_score.max(0.0);
    let ceiling = max_raw_score.max(MIN_MAX_RAW_SCORE);
    let percent = raw_score.ln_1p() / ceiling.ln_1p() * 100.0;
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}

/// Jaccard similarity of two topic collections compared case-insensitively.
///
/// Returns 0.0 when either side is empty.
pub fn relevance_score<U, T>(user_topics: U, target_topics: T) -> f64
where
    U: IntoIterator,
    U::Item: AsRef<str>,
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let user = lowercase_set(user_topics);
    let target = lowercase_set(target_topics);
    if user.is_empty() || target.is_empty() {
        return 0.0;
    }
    let intersection = user.intersection(&target).count();
    let union = user.union(&target).count();
    intersection as f64 / union as f64
}

fn lowercase_set<I>(topics: I) -> HashSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    topics.into_iter().map(|topic| topic.as_ref().to_lowercase()).collect()
}
