// src/collector/client.rs
use super::SearchSource;
use crate::app_log;
use crate::config::CollectorConfig;
use crate::error::{PipelineError, PipelineResult};
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, RequestBuilder};

/// Fixed `a` query parameter the search endpoint expects alongside paging.
const PAGINATION_MARKER: &str = "hpb";

/// Fetches WUZZUF search result pages.
pub struct WuzzufClient {
    client: Client,
    base_url: String,
    headers: HeaderMap,
}

impl WuzzufClient {
    pub fn new(config: &CollectorConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?,
        );

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            headers,
        })
    }

    /// GET for one result page: `?q=<term>&a=hpb&start=<page>` with browser headers.
    fn request(&self, term: &str, page: u32) -> RequestBuilder {
        let start = page.to_string();
        self.client
            .get(&self.base_url)
            .headers(self.headers.clone())
            .query(&[("q", term), ("a", PAGINATION_MARKER), ("start", start.as_str())])
    }
}

impl SearchSource for WuzzufClient {
    async fn fetch_page(&self, term: &str, page: u32) -> PipelineResult<String> {
        app_log!(debug, "GET {} q={} start={}", self.base_url, term, page);

        let response = self
            .request(term, page)
            .send()
            .await
            .map_err(|e| PipelineError::fetch(term, page, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::fetch(term, page, format!("HTTP error: {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| PipelineError::fetch(term, page, format!("Failed to read response body: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_request_carries_query_and_browser_headers() {
        let config = CollectorConfig::default();
        let client = WuzzufClient::new(&config).unwrap();
        let request = client.request("Data Analyst", 2).build().unwrap();

        assert_eq!(request.method(), &reqwest::Method::GET);
        assert_eq!(request.url().host_str(), Some("wuzzuf.net"));
        assert_eq!(request.url().path(), "/search/jobs/");

        let query: Vec<(String, String)> = request.url().query_pairs().into_owned().collect();
        assert_eq!(
            query,
            vec![
                ("q".to_string(), "Data Analyst".to_string()),
                ("a".to_string(), "hpb".to_string()),
                ("start".to_string(), "2".to_string()),
            ]
        );

        let headers = request.headers();
        assert_eq!(headers[USER_AGENT].to_str().unwrap(), config.user_agent);
        assert!(headers[ACCEPT].to_str().unwrap().starts_with("text/html"));
        assert_eq!(headers[ACCEPT_LANGUAGE].to_str().unwrap(), "en-US,en;q=0.5");
    }

    #[test]
    fn test_invalid_user_agent_is_rejected() {
        let config = CollectorConfig {
            user_agent: "bad\nagent".to_string(),
            ..CollectorConfig::default()
        };
        assert!(WuzzufClient::new(&config).is_err());
    }
}
