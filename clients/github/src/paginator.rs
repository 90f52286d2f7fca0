use derive_more::Constructor;
use reqwest::header::{HeaderMap, HeaderValue, LINK};
use url::Url;

#[derive(Constructor, Debug, PartialEq)]
pub(crate) struct Page {
    pub page_no: u32,
    pub page_size: u32,
}

/// Walks pages until one comes back shorter than the page size.
#[derive(Constructor)]
pub(crate) struct Paginator {
    page_no: u32,
    page_size: u32,
    exhausted: bool,
}

impl Paginator {
    pub(crate) fn starting_at(page_no: u32, page_size: u32) -> Self {
        Paginator::new(page_no, page_size, false)
    }

    pub(crate) fn next_page(&mut self) -> Option<Page> {
        if self.exhausted {
            return None;
        }
        Some(Page::new(self.page_no, self.page_size))
    }

    pub(crate) fn page_loaded(&mut self, items: usize) {
        if items < self.page_size as usize {
            self.exhausted = true;
        } else {
            self.page_no += 1;
        }
    }
}

/// Page number of the `rel="last"` entry of a `Link` header.
pub(crate) fn last_page(headers: &HeaderMap<HeaderValue>) -> Option<u64> {
    let link = headers.get(LINK)?.to_str().ok()?;
    link.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim().trim_start_matches('<').trim_end_matches('>');
        if !parts.any(|param| param.trim() == r#"rel="last""#) {
            return None;
        }
        let url = Url::parse(target).ok()?;
        let page = url.query_pairs().find(|(key, _)| key == "page")?.1;
        page.parse().ok()
    })
}

#[test]
fn paginator_stops_on_short_page_test() {
    let mut paginator = Paginator::starting_at(1, 100);
    assert_eq!(paginator.next_page(), Some(Page::new(1, 100)));
    paginator.page_loaded(100);
    assert_eq!(paginator.next_page(), Some(Page::new(2, 100)));
    paginator.page_loaded(42);
    assert_eq!(paginator.next_page(), None);
}

#[test]
fn paginator_empty_first_page_test() {
    let mut paginator = Paginator::starting_at(1, 30);
    assert!(paginator.next_page().is_some());
    paginator.page_loaded(0);
    assert_eq!(paginator.next_page(), None);
}

#[test]
fn last_page_test() {
    let mut headers = HeaderMap::new();
    headers.insert(
        LINK,
        HeaderValue::from_static(
            r#"<https://api.github.com/repositories/1/commits?author=octocat&per_page=1&page=2>; rel="next", <https://api.github.com/repositories/1/commits?author=octocat&per_page=1&page=341>; rel="last""#,
        ),
    );
    assert_eq!(last_page(&headers), Some(341));
}

#[test]
fn last_page_missing_test() {
    assert_eq!(last_page(&HeaderMap::new()), None);
    let mut headers = HeaderMap::new();
    headers.insert(
        LINK,
        HeaderValue::from_static(r#"<https://api.github.com/user/repos?page=1>; rel="prev""#),
    );
    assert_eq!(last_page(&headers), None);
}
