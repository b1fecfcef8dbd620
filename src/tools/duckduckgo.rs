use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use crate::models::SearchHit;
use crate::tools::SearchProvider;

/// Keyless web search against the DuckDuckGo HTML endpoint.
#[derive(Debug, Clone)]
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    endpoint: String,
}

impl DuckDuckGoSearch {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    async fn fetch_results_page(&self, query: &str) -> Result<String, String> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }

        response
            .text()
            .await
            .map_err(|e| format!("failed to read body: {e}"))
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    async fn search(&self, query: &str, num_results: usize) -> Vec<SearchHit> {
        let html = match self.fetch_results_page(query).await {
            Ok(html) => html,
            Err(e) => {
                warn!("DuckDuckGo search failed: {e}");
                return Vec::new();
            }
        };

        match tokio::task::spawn_blocking(move || parse_results(&html, num_results)).await {
            Ok(hits) => {
                debug!("DuckDuckGo returned {} hits", hits.len());
                hits
            }
            Err(e) => {
                warn!("DuckDuckGo result parsing aborted: {e}");
                Vec::new()
            }
        }
    }
}

/// Each `.result` block carries its own link and, usually, a snippet.
fn parse_results(html: &str, limit: usize) -> Vec<SearchHit> {
    let soup = scrape_core::Soup::parse(html);

    let Ok(results) = soup.find_all(".result") else {
        return Vec::new();
    };

    results
        .into_iter()
        .filter_map(|result| {
            let link = result.find("a.result__a").ok().flatten()?;
            let url = resolve_result_url(link.get("href")?)?;
            let snippet = result
                .find(".result__snippet")
                .ok()
                .flatten()
                .map(|tag| tag.text().trim().to_owned())
                .unwrap_or_default();
            Some(SearchHit {
                url,
                title: link.text().trim().to_owned(),
                snippet,
            })
        })
        .take(limit)
        .collect()
}

/// Result links point at a `/l/?uddg=<target>` redirect; unwrap it and drop
/// anything that still points back at DuckDuckGo (ads, internal pages).
fn resolve_result_url(href: &str) -> Option<String> {
    let absolute = match href.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => href.to_owned(),
    };
    let parsed = Url::parse(&absolute).ok()?;

    let target = match parsed.query_pairs().find(|(key, _)| key == "uddg") {
        Some((_, target)) => target.into_owned(),
        None => absolute,
    };

    let target_url = Url::parse(&target).ok()?;
    let is_web = matches!(target_url.scheme(), "http" | "https");
    let is_internal = target_url
        .host_str()
        .is_some_and(|host| host.ends_with("duckduckgo.com"));

    (is_web && !is_internal).then_some(target)
}
