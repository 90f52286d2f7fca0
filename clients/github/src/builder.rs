use crate::GithubClient;
use anyhow::Context;
use compat_score::api::{Error, Result};
use reqwest::header;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use reqwest::ClientBuilder;
use secrecy::ExposeSecret;
use url::Url;

pub const DEFAULT_GITHUB_URL: &str = "https://api.github.com";

pub struct GithubClientBuilder {
    client_builder: ClientBuilder,
    github_url: String,
    headers: HeaderMap,
}

impl Default for GithubClientBuilder {
    fn default() -> Self {
        let mut headers = HeaderMap::default();
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_static(concat!("compat_score/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));
        Self {
            client_builder: ClientBuilder::default(),
            github_url: DEFAULT_GITHUB_URL.to_string(),
            headers,
        }
    }
}

impl GithubClientBuilder {
    pub fn try_with_token(self, token: secrecy::SecretString) -> Result<GithubClientBuilder> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| Error::InvalidArgument("API token contains invalid characters".to_string()))?;
        value.set_sensitive(true);
        Ok(self.with_header(header::AUTHORIZATION, value))
    }

    pub fn with_github_url<STR: AsRef<str>>(mut self, url: STR) -> GithubClientBuilder {
        self.github_url = url.as_ref().to_string();
        self
    }

    fn with_header(mut self, key: HeaderName, val: HeaderValue) -> GithubClientBuilder {
        self.headers.insert(key, val);
        self
    }

    pub fn build(self) -> Result<GithubClient> {
        let github_url = Url::parse(&self.github_url)
            .map_err(|err| Error::InvalidArgument(format!("API URL {}: {}", self.github_url, err)))?;
        if github_url.cannot_be_a_base() {
            return Err(Error::InvalidArgument(format!("API URL {} cannot be a base", github_url)));
        }
        let client = self
            .client_builder
            .default_headers(self.headers)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(GithubClient { client, github_url })
    }
}

#[test]
fn build_rejects_bad_url_test() {
    let client = GithubClientBuilder::default().with_github_url("not a url").build();
    assert!(matches!(client, Err(Error::InvalidArgument(_))));
    let client = GithubClientBuilder::default().with_github_url("mailto:octocat@github.com").build();
    assert!(matches!(client, Err(Error::InvalidArgument(_))));
}

#[test]
fn build_with_token_test() {
    let client = GithubClientBuilder::default()
        .try_with_token(secrecy::SecretString::new("ghp_secret".to_string()))
        .and_then(GithubClientBuilder::build);
    assert!(client.is_ok());
    let client = GithubClientBuilder::default().try_with_token(secrecy::SecretString::new("bad\ntoken".to_string()));
    assert!(client.is_err());
}

#[test]
fn default_headers_test() {
    let builder = GithubClientBuilder::default();
    let user_agent = builder.headers.get(header::USER_AGENT).and_then(|value| value.to_str().ok());
    assert!(user_agent.map_or(false, |value| value.starts_with("compat_score/")));
    assert_eq!(
        builder.headers.get(header::ACCEPT).and_then(|value| value.to_str().ok()),
        Some("application/vnd.github.v3+json")
    );
}
