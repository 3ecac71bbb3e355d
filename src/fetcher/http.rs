//! Blocking HTTP fetcher built on reqwest

use crate::config::UserAgentConfig;
use crate::fetcher::{FetchError, FetchResponse, Fetcher};
use mime::Mime;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use classifind::config::UserAgentConfig;
/// use classifind::fetcher::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "Classifind".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL; ContactEmail)
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetcher`] that performs real network requests
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Fetcher for HttpFetcher {
    fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| classify_error(url, e))?;

        let status = response.status().as_u16();
        let charset = declared_charset(response.headers());
        let body = response
            .bytes()
            .map_err(|e| classify_error(url, e))?
            .to_vec();

        Ok(FetchResponse {
            status,
            charset,
            body,
        })
    }
}

/// Reads the `charset` parameter of the `Content-Type` header
fn declared_charset(headers: &HeaderMap) -> Option<String> {
    let content_type = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    let mime: Mime = content_type.parse().ok()?;
    mime.get_param(mime::CHARSET)
        .map(|charset| charset.as_str().to_string())
}

/// Separates "nobody answered" from every other request failure
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_connect() {
        FetchError::Unreachable {
            url: url.to_string(),
            reason: error.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            reason: error.to_string(),
        }
    }
}
