//! HTTP client for the emploitic.com job board.

use std::time::Duration;

use url::Url;

use crate::{
    query::{ListingQuery, Query},
    user_agent::get_user_agent,
    Error,
};

/// Path of the paginated job listing.
const LISTING_PATH: &str = "/offres-d-emploi";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the job board.
///
/// Sends every request with the same browser user agent. The underlying
/// `reqwest::Client` is built once and reused for listing and detail pages.
pub struct Client {
    /// Base URL for the board. Defaults to `https://www.emploitic.com`.
    base_url: String,
    http: reqwest::Client,
}

impl Client {
    /// Creates a client pointing at the production board.
    pub fn new() -> Result<Self, Error> {
        Self::with_base_url("https://www.emploitic.com")
    }

    /// Creates a client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom base URL and request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the listing URL for the given query.
    pub fn listing_url(&self, query: &ListingQuery) -> Result<Url, Error> {
        let url = Url::parse(format!("{}{}", &self.base_url, LISTING_PATH).as_str())
            .map_err(|e| {
                tracing::error!("Invalid URL constructed: {}", e);
                Error::InvalidUrl(e.to_string())
            })?;
        Ok(query.add_to_url(&url))
    }

    /// Fetches one results page and returns its raw markup.
    pub async fn get_listing_page(&self, query: &ListingQuery) -> Result<String, Error> {
        let url = self.listing_url(query)?;
        self.get(url).await
    }

    /// Fetches an absolute URL (a listing's detail page) and returns its raw markup.
    pub async fn get_page(&self, url: &str) -> Result<String, Error> {
        let url = Url::parse(url).map_err(|e| {
            tracing::error!("Invalid detail URL {}: {}", url, e);
            Error::InvalidUrl(format!("{}: {}", url, e))
        })?;
        self.get(url).await
    }

    async fn get(&self, url: Url) -> Result<String, Error> {
        tracing::debug!("GET {}", url);
        let resp = self
            .http
            .get(url)
            .header("accept", "text/html,application/xhtml+xml")
            .header("accept-language", "fr-FR,fr;q=0.9,en;q=0.8")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::RequestFailed
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        Ok(body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
