use regex::Regex;
use std::sync::LazyLock;

static WORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").unwrap());

const STOPWORDS: [&str; 11] = ["the", "and", "of", "a", "in", "to", "for", "with", "on", "by", "an"];

/// Extracts keywords from a repository description.
///
/// Used as topic fallback for repositories without declared topics. The text is lowercased and split
/// on word boundaries, so hyphenated words produce separate tokens. Stopwords and tokens of at most
/// two characters are dropped. Duplicates are kept.
pub fn extract_keywords(text: Option<&str>) -> Vec<String> {
    let text = match text {
        Some(text) => text.to_lowercase(),
        None => return Vec::new(),
    };
    WORD_PATTERN
        .find_iter(&text)
        .map(|word| word.as_str())
        .filter(|word| !STOPWORDS.contains(word) && word.chars().count() > 2)
        .map(str::to_string)
        .collect()
}

#[test]
fn keywords_description_test() {
    let keywords = extract_keywords(Some("A Deep-Learning project for NLP."));
    assert_eq!(keywords, vec!["deep", "learning", "project", "nlp"]);
}

#[test]
fn keywords_none_test() {
    assert!(extract_keywords(None).is_empty());
    assert!(extract_keywords(Some("")).is_empty());
}

#[test]
fn keywords_short_and_stopwords_test() {
    let keywords = extract_keywords(Some("To be or not to be, with the API in Go"));
    assert_eq!(keywords, vec!["not", "api"]);
}

#[test]
fn keywords_keep_duplicates_and_digits_test() {
    let keywords = extract_keywords(Some("rust_lang tools: rust tools 2024"));
    assert_eq!(keywords, vec!["rust_lang", "tools", "rust", "tools", "2024"]);
}
