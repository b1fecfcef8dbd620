//! Page fetching and main-content extraction.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::models::ExtractedDocument;
use crate::tools::ContentExtractor;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

const MAX_BODY_BYTES: u64 = 5 * 1024 * 1024;

/// Fragments shorter than this are treated as navigation or widget noise.
const MIN_PARAGRAPH_CHARS: usize = 40;

/// Scopes tried in order; the first that yields any paragraph wins.
const CONTENT_SCOPES: [&str; 3] = ["article", "main", "body"];

#[derive(Debug, Clone)]
pub struct HttpExtractor {
    client: reqwest::Client,
}

impl HttpExtractor {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }

    async fn fetch_html(&self, url: &str) -> Result<String, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("fetch failed: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }

        if let Some(length) = response.content_length() {
            if length > MAX_BODY_BYTES {
                return Err(format!("response too large: {length} bytes"));
            }
        }

        // decoded with the charset named in Content-Type, UTF-8 otherwise
        let html = response
            .text()
            .await
            .map_err(|e| format!("failed to read body: {e}"))?;
        if html.len() as u64 > MAX_BODY_BYTES {
            return Err(format!("response too large: {} bytes", html.len()));
        }

        Ok(html)
    }
}

#[async_trait]
impl ContentExtractor for HttpExtractor {
    async fn extract(&self, url: &str) -> Option<ExtractedDocument> {
        let html = match self.fetch_html(url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(url, "extraction skipped: {e}");
                return None;
            }
        };

        let owned_url = url.to_owned();
        let document = tokio::task::spawn_blocking(move || parse_document(&owned_url, &html))
            .await
            .map_err(|e| warn!(url, "html parsing aborted: {e}"))
            .ok()
            .flatten();

        if document.is_none() {
            debug!(url, "no main content found");
        }
        document
    }
}

fn parse_document(url: &str, html: &str) -> Option<ExtractedDocument> {
    let soup = scrape_core::Soup::parse(html);

    let title = soup
        .find_all("title")
        .ok()
        .and_then(|tags| tags.into_iter().next())
        .map(|tag| collapse_whitespace(&tag.text()))
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| url.to_owned());

    let content = CONTENT_SCOPES.iter().find_map(|scope| {
        let paragraphs: Vec<String> = soup
            .find_all(&format!("{scope} p"))
            .ok()?
            .into_iter()
            .map(|tag| collapse_whitespace(&tag.text()))
            .filter(|text| text.chars().count() >= MIN_PARAGRAPH_CHARS)
            .collect();
        (!paragraphs.is_empty()).then(|| paragraphs.join("\n\n"))
    })?;

    Some(ExtractedDocument {
        url: url.to_owned(),
        title,
        content,
    })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
