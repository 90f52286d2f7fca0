use crate::api::SkippedRepo;
use derive_more::Constructor;
use std::collections::HashMap;
use std::fmt::Display;

pub const TOP_LANGUAGES_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct LanguageCount {
    pub language: String,
    pub repos: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct TopLanguages {
    pub username: String,
    pub languages: Vec<LanguageCount>,
    pub skipped: Vec<SkippedRepo>,
}

impl TopLanguages {
    pub fn names(&self) -> Vec<&str> {
        self.languages.iter().map(|count| count.language.as_str()).collect()
    }
}

impl Display for TopLanguages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Top languages used by {}: {:?}", self.username, self.names())
    }
}

/// Returns up to `n` languages ordered by the number of repositories using them.
///
/// Repositories without a primary language are ignored. Equal counts are ordered by language name.
pub fn rank_languages<'a, I>(languages: I, n: usize) -> Vec<LanguageCount>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut tally: HashMap<&str, u32> = HashMap::new();
    for language in languages.into_iter().flatten().filter(|language| !language.is_empty()) {
        *tally.entry(language).or_insert(0) += 1;
    }
    let mut counts: Vec<LanguageCount> = tally
        .into_iter()
        .map(|(language, repos)| LanguageCount::new(language.to_string(), repos))
        .collect();
    counts.sort_by(|a, b| b.repos.cmp(&a.repos).then_with(|| a.language.cmp(&b.language)));
    counts.truncate(n);
    counts
}

#[test]
fn rank_languages_top_three_test() {
    let languages = vec![
        Some("Rust"),
        Some("Python"),
        None,
        Some("Rust"),
        Some("Go"),
        Some("Python"),
        Some("Rust"),
        Some("C"),
        Some(""),
    ];
    let ranked = rank_languages(languages, TOP_LANGUAGES_COUNT);
    assert_eq!(
        ranked,
        vec![
            LanguageCount::new("Rust".to_string(), 3),
            LanguageCount::new("Python".to_string(), 2),
            LanguageCount::new("C".to_string(), 1),
        ]
    );
}

#[test]
fn rank_languages_tie_break_test() {
    let ranked = rank_languages(vec![Some("Zig"), Some("Ada"), Some("Go")], 2);
    let names: Vec<&str> = ranked.iter().map(|count| count.language.as_str()).collect();
    assert_eq!(names, vec!["Ada", "Go"]);
}

#[test]
fn rank_languages_none_test() {
    assert!(rank_languages(vec![None, None], TOP_LANGUAGES_COUNT).is_empty());
}

#[test]
fn top_languages_display_test() {
    let top = TopLanguages::new(
        "octocat".to_string(),
        vec![LanguageCount::new("Rust".to_string(), 2), LanguageCount::new("Go".to_string(), 1)],
        Vec::new(),
    );
    assert_eq!(top.to_string(), r#"Top languages used by octocat: ["Rust", "Go"]"#);
}
