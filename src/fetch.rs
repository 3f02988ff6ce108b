use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::api_types::{SearchRequest, SearchResponse};
use crate::format::format_records;
use crate::models::SearchOutcome;

pub struct SearchClient {
    client: Client,
    endpoint: Url,
}

impl SearchClient {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// One search round trip. Any non-2xx status is a failure; the body is
    /// normalized record by record.
    pub async fn search(&self, query: &str) -> Result<SearchOutcome> {
        let start = std::time::Instant::now();
        debug!("Posting search - endpoint={}, query={:?}", self.endpoint, query);

        let resp = self
            .client
            .post(self.endpoint.clone())
            .json(&SearchRequest { query: query.to_string() })
            .send()
            .await
            .with_context(|| format!("Request failed for {}", self.endpoint))?;

        let resp = resp
            .error_for_status()
            .with_context(|| format!("HTTP error for {}", self.endpoint))?;

        let body: SearchResponse = resp
            .json()
            .await
            .with_context(|| format!("Decoding JSON for {}", self.endpoint))?;

        let records = format_records(&body.results);
        info!(
            "Search completed - duration={:.2}s, total={}, results={}, keywords={}",
            start.elapsed().as_secs_f32(),
            body.total,
            records.len(),
            body.keywords.len()
        );

        Ok(SearchOutcome {
            keywords: body.keywords,
            total: body.total,
            records,
        })
    }
}
