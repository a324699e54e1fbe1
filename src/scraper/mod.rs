//! Scraper module for fetching HTML content from the target site
//!
//! This module provides HTTP client functionality with a randomized
//! browser-like identity header for fetching HTML pages from huale.tv.

use rand::Rng;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during scraping operations
#[derive(Error, Debug)]
pub enum ScraperError {
    /// Network-related errors (connection timeout, DNS failure, etc.)
    #[error("Failed to connect to server: {0}")]
    NetworkError(String),

    /// HTTP non-2xx status code errors
    #[error("Server returned status {0}")]
    HttpError(u16),

    /// Error reading response body
    #[error("Failed to read response body: {0}")]
    ResponseError(String),
}

/// List of realistic user agents for rotation
const USER_AGENTS: &[&str] = &[
    // Chrome on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    // Chrome on macOS
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    // Firefox on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    // Firefox on macOS
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:121.0) Gecko/20100101 Firefox/121.0",
    // Safari on macOS
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
    // Edge on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0",
];

/// Strategy for choosing the User-Agent sent with each request
///
/// Injected into [`Fetcher`] so tests can pin a deterministic identity.
pub trait UserAgentPicker: Send + Sync {
    /// Pick the identity string for the next request
    fn pick(&self) -> &'static str;
}

/// Default picker: a random entry from the realistic pool
pub struct RandomUserAgent;

impl UserAgentPicker for RandomUserAgent {
    fn pick(&self) -> &'static str {
        let idx = rand::thread_rng().gen_range(0..USER_AGENTS.len());
        USER_AGENTS[idx]
    }
}

/// HTTP client for fetching catalog pages
///
/// One outbound request per call, no retries. Failures are returned as
/// values, never raised to the caller.
pub struct Fetcher {
    client: Client,
    user_agent: Box<dyn UserAgentPicker>,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher {
    /// Create a new Fetcher with random user-agent rotation
    pub fn new() -> Self {
        Self::with_user_agent(Box::new(RandomUserAgent))
    }

    /// Create a new Fetcher with a custom user-agent strategy
    pub fn with_user_agent(user_agent: Box<dyn UserAgentPicker>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self { client, user_agent }
    }

    /// Fetch a page using the client's default timeout (30s)
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        self.do_fetch(url, None).await
    }

    /// Fetch a page with an explicit per-request timeout
    pub async fn fetch_page_timeout(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<String, ScraperError> {
        self.do_fetch(url, Some(timeout)).await
    }

    /// Internal fetch implementation
    async fn do_fetch(
        &self,
        url: &str,
        timeout: Option<Duration>,
    ) -> Result<String, ScraperError> {
        let mut request = self
            .client
            .get(url)
            .header("User-Agent", self.user_agent.pick())
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "zh-CN,zh;q=0.9,en;q=0.8");

        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ScraperError::NetworkError("Connection timeout".to_string())
            } else if e.is_connect() {
                ScraperError::NetworkError("Failed to connect to server".to_string())
            } else {
                ScraperError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::HttpError(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| ScraperError::ResponseError(e.to_string()))
    }
}
