use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::generator::ArticleSource;
use crate::generator::article::Article;
use crate::generator::cache::{FetchError, fetch_url};

pub const RANDOM_SUMMARY_URL: &str = "https://en.wikipedia.org/api/rest_v1/page/random/summary";

pub const DEFAULT_MIN_CHARS: usize = 600;
pub const DEFAULT_MAX_CHARS: usize = 1200;
pub const DEFAULT_TRIES: usize = 5;

static CITATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\d+\]").expect("citation pattern"));
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

#[derive(Debug, Default, Deserialize)]
struct Summary {
    title: Option<String>,
    extract: Option<String>,
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Default, Deserialize)]
struct ContentUrls {
    desktop: Option<PageUrls>,
}

#[derive(Debug, Default, Deserialize)]
struct PageUrls {
    page: Option<String>,
}

/// Strip `[12]`-style citation markers and collapse runs of whitespace.
pub fn clean_text(text: &str) -> String {
    let without_refs = CITATION_RE.replace_all(text, "");
    WHITESPACE_RE
        .replace_all(&without_refs, " ")
        .trim()
        .to_string()
}

fn candidate_from_summary(summary: Summary, max_chars: usize) -> Option<Article> {
    let text = clean_text(summary.extract.as_deref().unwrap_or_default());
    if text.is_empty() || !text.is_ascii() {
        return None;
    }
    let text: String = text.chars().take(max_chars).collect();
    let title = summary
        .title
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Unknown Title".to_string());
    let url = summary
        .content_urls
        .and_then(|c| c.desktop)
        .and_then(|d| d.page)
        .unwrap_or_else(|| "https://en.wikipedia.org".to_string());
    Some(Article::new(title, url, text))
}

/// Retry loop shared by the live client and tests. `get` performs one request.
///
/// Returns the first candidate of at least `min_chars`, else the last usable
/// candidate. Fails with the last request error when nothing responded, or
/// with [`FetchError::NoCandidate`] when responses held no usable extract.
/// At least one request is made even when `tries` is 0.
pub fn fetch_with<F>(mut get: F, min_chars: usize, max_chars: usize, tries: usize) -> Result<Article, FetchError>
where
    F: FnMut() -> Result<String, FetchError>,
{
    let mut last_candidate: Option<Article> = None;
    let mut last_error: Option<FetchError> = None;
    let mut responses = 0;

    for attempt in 1..=tries.max(1) {
        let body = match get() {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(attempt, error = %e, "article request failed");
                last_error = Some(e);
                continue;
            }
        };
        responses += 1;

        let summary: Summary = match serde_json::from_str(&body) {
            Ok(summary) => summary,
            Err(e) => {
                tracing::debug!(attempt, error = %e, "unparseable summary");
                continue;
            }
        };

        let Some(article) = candidate_from_summary(summary, max_chars) else {
            continue;
        };
        if article.extract_len >= min_chars {
            return Ok(article);
        }
        last_candidate = Some(article);
    }

    match (last_candidate, last_error) {
        (Some(article), _) => Ok(article),
        (None, Some(e)) if responses == 0 => Err(e),
        (None, _) => Err(FetchError::NoCandidate(responses)),
    }
}

/// Fetch a random article, degrading to the fallback article on failure.
pub fn fetch_random_article(min_chars: usize, max_chars: usize, tries: usize) -> Article {
    match fetch_with(|| fetch_url(RANDOM_SUMMARY_URL), min_chars, max_chars, tries) {
        Ok(article) => article,
        Err(e) => {
            tracing::warn!(error = %e, "no usable Wikipedia article, using fallback text");
            Article::fallback()
        }
    }
}

#[derive(Clone, Debug)]
pub struct WikipediaSource {
    pub min_chars: usize,
    pub max_chars: usize,
    pub tries: usize,
}

impl Default for WikipediaSource {
    fn default() -> Self {
        Self {
            min_chars: DEFAULT_MIN_CHARS,
            max_chars: DEFAULT_MAX_CHARS,
            tries: DEFAULT_TRIES,
        }
    }
}

impl ArticleSource for WikipediaSource {
    fn fetch(&mut self) -> Result<Article, FetchError> {
        fetch_with(
            || fetch_url(RANDOM_SUMMARY_URL),
            self.min_chars,
            self.max_chars,
            self.tries,
        )
    }
}
