mod args;

pub use args::{prompt_username, Args, Command, ScoreArgs};

use compat_score::api::{Error, Result};
use compat_score::{CompatibilityReport, MatchOptions, ProfileScore, ScoreWeights, Scorer, TopLanguages};
use github_client::{GithubClient, GithubClientBuilder};
use log::debug;
use secrecy::SecretString;
use std::fmt::Display;

#[derive(Debug)]
pub enum Report {
    Languages(TopLanguages),
    Compatibility(CompatibilityReport),
    Profile(ProfileScore),
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Report::Languages(languages) => write!(f, "{}", languages),
            Report::Compatibility(compatibility) => write!(f, "{}", compatibility),
            Report::Profile(profile) => write!(f, "{}", profile),
        }
    }
}

pub fn github_client(api_url: &str, api_token: Option<SecretString>) -> Result<GithubClient> {
    let mut client = GithubClientBuilder::default().with_github_url(api_url);
    if let Some(token) = api_token {
        client = client.try_with_token(token)?;
    }
    client.build()
}

pub async fn run(args: Args) -> Result<Report> {
    let username = args
        .command
        .username()
        .map(str::to_string)
        .filter(|username| !username.is_empty())
        .ok_or(Error::Error("Missing GitHub username."))?;
    debug!("Running {:?} for {} against {}", args.command, username, args.api_url);
    let client = github_client(&args.api_url, args.api_token)?;
    let scorer = Scorer::new(client);

    let report = match args.command {
        Command::Languages { .. } => Report::Languages(scorer.top_languages(&username).await?),
        Command::Score(score) => {
            let weights = ScoreWeights::new(score.activity_weight, score.project_weight, score.admin_weight);
            let options = MatchOptions::new(weights, score.max_raw_score);
            let report = scorer
                .combined_matching_score(&username, &score.project_topics, &score.admin_topics, &options)
                .await?;
            Report::Compatibility(report)
        }
        Command::Profile { .. } => Report::Profile(scorer.profile_score(&username).await?),
    };
    Ok(report)
}
