use clap::{Parser, Subcommand};
use secrecy::SecretString;
use std::{
    fmt::{Debug, Display},
    io::{self, BufRead, Write},
    str::FromStr,
};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,

    /// API OAuth access token
    #[clap(short, long, env)]
    pub api_token: Option<SecretString>,

    /// Repository API URL
    #[clap(long, env, default_value = "https://api.github.com")]
    pub api_url: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Top 3 languages of a user by repository count
    Languages {
        /// GitHub username, asked for when missing
        username: Option<String>,
    },
    /// Compatibility of a user with project and admin topics
    Score(ScoreArgs),
    /// Profile score from user and repository listing data
    Profile {
        /// GitHub username, asked for when missing
        username: Option<String>,
    },
}

impl Command {
    pub fn username(&self) -> Option<&str> {
        match self {
            Command::Languages { username } | Command::Profile { username } => username.as_deref(),
            Command::Score(args) => args.username.as_deref(),
        }
    }

    pub fn set_username(&mut self, name: String) {
        match self {
            Command::Languages { username } | Command::Profile { username } => *username = Some(name),
            Command::Score(args) => args.username = Some(name),
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ScoreArgs {
    /// GitHub username, asked for when missing
    pub username: Option<String>,

    /// Topics of the project
    #[clap(
        long,
        env,
        use_value_delimiter = true,
        default_values = &["machine-learning", "nlp", "Python", "deep-learning", "JavaScript"]
    )]
    pub project_topics: Vec<String>,

    /// Topics preferred by the organization admin
    #[clap(long, env, use_value_delimiter = true, default_values = &["Python", "django", "api", "web"])]
    pub admin_topics: Vec<String>,

    /// Weight of the activity score
    #[clap(long, env, default_value_t = 0.6, parse(try_from_str=weight_in_range))]
    pub activity_weight: f64,

    /// Weight of the project relevance score
    #[clap(long, env, default_value_t = 0.2, parse(try_from_str=weight_in_range))]
    pub project_weight: f64,

    /// Weight of the admin compatibility score
    #[clap(long, env, default_value_t = 0.2, parse(try_from_str=weight_in_range))]
    pub admin_weight: f64,

    /// Raw activity score counted as 100% activity
    #[clap(long, env, default_value_t = 1_000_000.0, parse(try_from_str=max_raw_score_in_range))]
    pub max_raw_score: f64,
}

fn weight_in_range(value: &str) -> clap::Result<f64, String> {
    number_in_range(value, 0.0, 1.0, "weight".to_string())
}

fn max_raw_score_in_range(value: &str) -> clap::Result<f64, String> {
    number_in_range(value, 1.0, f64::MAX, "max_raw_score".to_string())
}

fn number_in_range<T>(value: &str, min: T, max: T, name: String) -> clap::Result<T, String>
where
    T: FromStr + PartialOrd + Display,
    <T as FromStr>::Err: Display,
{
    value.parse::<T>().map_err(|err| format!("{}", err)).and_then(|value| {
        if !(value >= min && value <= max) {
            return Err(format!("{} is not in range {} .. {}.", name, min, max));
        }
        Ok(value)
    })
}

/// Asks for a username on stdin.
pub fn prompt_username() -> io::Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "Enter GitHub username: ")?;
    stdout.flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[test]
fn number_in_range_test() {
    assert_eq!(weight_in_range("0.5"), Ok(0.5));
    assert!(weight_in_range("1.5").is_err());
    assert!(weight_in_range("-0.1").is_err());
    assert!(weight_in_range("NaN").is_err());
    assert!(weight_in_range("heavy").is_err());
    assert_eq!(max_raw_score_in_range("500000"), Ok(500_000.0));
    assert!(max_raw_score_in_range("0").is_err());
    assert!(max_raw_score_in_range("0.5").is_err());
    assert!(max_raw_score_in_range("1e-20").is_err());
    assert_eq!(max_raw_score_in_range("1"), Ok(1.0));
}

#[test]
fn parse_score_defaults_test() {
    let args = Args::try_parse_from(["compat_score", "score", "octocat"]).unwrap();
    match args.command {
        Command::Score(score) => {
            assert_eq!(score.username.as_deref(), Some("octocat"));
            assert_eq!(score.admin_topics, vec!["Python", "django", "api", "web"]);
            assert_eq!(score.project_topics.len(), 5);
            assert_eq!(score.activity_weight, 0.6);
            assert_eq!(score.max_raw_score, 1_000_000.0);
        }
        command => panic!("Unexpected command {:?}", command),
    }
}

#[test]
fn parse_topics_and_username_test() {
    let mut args = Args::try_parse_from([
        "compat_score",
        "--api-url",
        "http://localhost:8080",
        "score",
        "--project-topics",
        "rust,wasm",
        "--admin-weight",
        "0.4",
    ])
    .unwrap();
    assert_eq!(args.api_url, "http://localhost:8080");
    assert_eq!(args.command.username(), None);
    args.command.set_username("octocat".to_string());
    assert_eq!(args.command.username(), Some("octocat"));
    match args.command {
        Command::Score(score) => {
            assert_eq!(score.project_topics, vec!["rust", "wasm"]);
            assert_eq!(score.admin_weight, 0.4);
        }
        command => panic!("Unexpected command {:?}", command),
    }
}
