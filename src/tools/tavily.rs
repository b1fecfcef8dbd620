use async_trait::async_trait;
use tracing::{debug, warn};

use crate::models::{SearchHit, TavilySearchRequest, TavilySearchResponse};
use crate::tools::SearchProvider;

#[derive(Debug)]
pub struct TavilyError(String);

impl std::fmt::Display for TavilyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tavily error: {}", self.0)
    }
}

impl std::error::Error for TavilyError {}

/// Web search through the Tavily API.
#[derive(Debug, Clone)]
pub struct TavilySearch {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl TavilySearch {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    async fn query(&self, query: &str, num_results: usize) -> Result<Vec<SearchHit>, TavilyError> {
        let request = TavilySearchRequest {
            query: query.to_string(),
            max_results: num_results,
            search_depth: "basic".to_string(),
            include_raw_content: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| TavilyError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(TavilyError(format!("HTTP {}", response.status())));
        }

        let search_response: TavilySearchResponse = response
            .json()
            .await
            .map_err(|e| TavilyError(format!("Failed to parse response: {}", e)))?;

        Ok(search_response
            .results
            .into_iter()
            .filter(|r| !r.url.is_empty())
            .take(num_results)
            .map(|r| SearchHit {
                url: r.url,
                title: r.title,
                snippet: r.content,
            })
            .collect())
    }
}

#[async_trait]
impl SearchProvider for TavilySearch {
    async fn search(&self, query: &str, num_results: usize) -> Vec<SearchHit> {
        match self.query(query, num_results).await {
            Ok(hits) => {
                debug!("Tavily returned {} hits", hits.len());
                hits
            }
            Err(e) => {
                warn!("{e}");
                Vec::new()
            }
        }
    }
}
