//! Contributor compatibility scoring
//!
//! # Overview
//!
//! Estimates how well a code hosting user fits a project and the organization running it.
//! For every repository of the user, library collects commit count, lines added by the most recent
//! commits, stars, topics (falling back to description keywords) and pull requests authored by the user.
//! The weighted sum of these totals (plus followers) is the raw activity score, compressed onto a
//! percentage by a logarithmic curve.
//! Topics collected over all repositories are compared with project and admin topics using Jaccard
//! similarity, and the three percentages are blended into the final compatibility percentage.
//!
//! Library also ranks the languages a user writes in and computes a cheap profile score from listing
//! data alone.
//!
//! Network access goes through the [`api::Client`] trait, the pipelines driving it live in `Scorer`
//! (feature `scorer`).

pub mod activity;
pub mod api;
pub mod keywords;
pub mod languages;
pub mod matcher;
pub mod profile;
#[cfg(feature = "scorer")]
mod scorer;
pub mod scoring;

pub use activity::{ActivityReport, UserActivity};
pub use languages::TopLanguages;
pub use matcher::{CompatibilityReport, CompatibilityResult, MatchOptions};
pub use profile::ProfileScore;
#[cfg(feature = "scorer")]
pub use scorer::Scorer;
pub use scoring::ScoreWeights;
