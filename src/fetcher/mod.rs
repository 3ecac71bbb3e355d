//! HTTP fetching
//!
//! The crawl loop only needs "GET this URL and give me the status and the
//! body". [`Fetcher`] captures that capability so the loop can run against
//! the real network ([`HttpFetcher`]) or an in-memory stand-in in tests.

mod http;

pub use http::{build_http_client, HttpFetcher};

use encoding_rs::{Encoding, UTF_8};
use thiserror::Error;

/// Status, declared charset and raw body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    /// `charset` parameter of the `Content-Type` header, if any
    pub charset: Option<String>,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            charset: None,
            body: body.into(),
        }
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    /// Returns true for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded with the declared charset
    ///
    /// Falls back to UTF-8 when no charset was declared or the label is
    /// unknown. A byte order mark overrides the declared charset and
    /// malformed sequences are replaced.
    pub fn text(&self) -> String {
        let encoding = self
            .charset
            .as_deref()
            .and_then(|label| Encoding::for_label(label.as_bytes()))
            .unwrap_or(UTF_8);
        let (text, _, _) = encoding.decode(&self.body);
        text.into_owned()
    }
}

/// Failure to obtain any response at all
#[derive(Debug, Error)]
pub enum FetchError {
    /// The host could not be resolved or connected to
    #[error("host unreachable for {url}: {reason}")]
    Unreachable { url: String, reason: String },

    /// The request was sent but failed (timeout, truncated body, ...)
    #[error("request failed for {url}: {reason}")]
    Transport { url: String, reason: String },
}

impl FetchError {
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }
}

/// Performs blocking GET requests
pub trait Fetcher {
    /// Fetches `url`, returning whatever status the server answered with
    ///
    /// Non-success statuses are not errors at this level; only the absence
    /// of a response is.
    fn get(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        (**self).get(url)
    }
}
