use std::fmt;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, ClientBuilder};
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, info, warn};

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

pub const MAX_PAGE_CHARS: usize = 10_000;
pub const PAGE_TRUNCATION_MARKER: &str = "... [text truncated]";
pub const NO_CONTENT_MESSAGE: &str = "No text content found on the page.";

/// Subtrees under these tags never contribute text.
const STRIPPED_TAGS: &[&str] = &["script", "style", "nav", "footer", "header"];

// Create static selectors and patterns to avoid recompiling them each time
static TEXT_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p, h1, h2, h3, h4, h5, h6").expect("Failed to parse text selector")
});

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("Failed to compile whitespace pattern")
});

static DISALLOWED_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\w\s.,!?;:]").expect("Failed to compile character filter")
});

/// Cleaned, length-bounded page text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText(String);

impl PageText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PageText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("Error scraping website: {0}")]
    Request(#[from] reqwest::Error),
}

/// Result of scraping one page. Failures are values, not faults.
pub type PageContent = std::result::Result<PageText, ScrapeError>;

#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new() -> reqwest::Result<Self> {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> reqwest::Result<Self> {
        let client = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    pub async fn scrape(&self, url: &str) -> PageContent {
        info!(url, "scraping page");

        let html = self.fetch_html(url).await.map_err(|e| {
            warn!(url, error = %e, "page fetch failed");
            ScrapeError::from(e)
        })?;

        let text = extract_text(&html);
        debug!(
            url,
            html_len = html.len(),
            text_chars = text.as_str().chars().count(),
            "extracted page text"
        );

        Ok(text)
    }

    async fn fetch_html(&self, url: &str) -> reqwest::Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        response.text().await
    }
}

/// Pulls readable text out of an HTML document: paragraph and heading text in
/// document order, cleaned, capped at [`MAX_PAGE_CHARS`].
pub fn extract_text(html: &str) -> PageText {
    let document = Html::parse_document(html);

    let fragments: Vec<String> = document
        .select(&TEXT_SELECTOR)
        .filter(|element| !inside_stripped(element))
        .map(|element| {
            let mut buf = String::new();
            collect_text(&element, &mut buf);
            buf
        })
        .collect();

    let cleaned = clean_text(&fragments.join(" "));
    if cleaned.is_empty() {
        return PageText(NO_CONTENT_MESSAGE.to_string());
    }

    PageText(truncate_chars(&cleaned, MAX_PAGE_CHARS, PAGE_TRUNCATION_MARKER))
}

fn inside_stripped(element: &ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| STRIPPED_TAGS.contains(&ancestor.value().name()))
}

fn collect_text(element: &ElementRef<'_>, buf: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => buf.push_str(text),
            Node::Element(el) if STRIPPED_TAGS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(&child_ref, buf);
                }
            }
            _ => {}
        }
    }
}

/// Collapses whitespace runs, drops everything but word characters,
/// whitespace and `.,!?;:`, then trims.
pub fn clean_text(text: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(text, " ");
    let filtered = DISALLOWED_CHARS.replace_all(&collapsed, "");
    filtered.trim().to_string()
}

/// Keeps the first `max_chars` characters and appends `marker` when anything
/// was cut. Counts chars, not bytes.
pub fn truncate_chars(text: &str, max_chars: usize, marker: &str) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => {
            let mut result = String::with_capacity(end + marker.len());
            result.push_str(&text[..end]);
            result.push_str(marker);
            result
        }
        None => text.to_string(),
    }
}
