//! HTTP page fetcher
//!
//! Talks to JSON collection APIs that page with `page`/`limit` query
//! parameters and answer with
//!
//! ```text
//! { "data": [ { "id": 1, ... }, ... ], "pagination": { "total": 125000 } }
//! ```
//!
//! (the shape served by the Art Institute of Chicago public API). Transient
//! failures are retried here with exponential backoff so the selection
//! engine only ever sees the final outcome.

use super::error::{FetchError, Result};
use super::{FetchedPage, PageFetcher};
use crate::record::Record;
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use std::time::Duration;

/// Default collection endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.artic.edu/api/v1/artworks";

/// Longest wait a `Retry-After` header can impose
pub const MAX_RETRY_WAIT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct PageResponse {
    data: Vec<Record>,
    pagination: Pagination,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    total: usize,
}

/// User agent sent with every request
#[must_use]
pub fn user_agent() -> String {
    format!("pagesel/{}", env!("CARGO_PKG_VERSION"))
}

/// Decode a page response body
///
/// # Errors
///
/// Returns `FetchError::Decode` if the body is not a page document.
pub fn parse_page_response(body: &str) -> Result<FetchedPage> {
    let response: PageResponse = serde_json::from_str(body)?;
    Ok(FetchedPage {
        records: response.data,
        total_records: response.pagination.total,
    })
}

/// Blocking HTTP fetcher with retry and backoff
pub struct HttpFetcher {
    client: Client,
    base_url: String,
    fields: Vec<String>,
    max_retries: usize,
    initial_backoff: Duration,
    max_retry_wait: Duration,
}

impl HttpFetcher {
    /// Create a fetcher for `base_url` with the given request timeout
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent())
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            fields: Vec::new(),
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
            max_retry_wait: MAX_RETRY_WAIT,
        })
    }

    /// Restrict the response to these fields (`id` is always requested)
    #[must_use]
    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    /// Number of retries after the first failed attempt
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Delay before the first retry; doubles on each further retry
    #[must_use]
    pub const fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    /// Upper bound on a server-requested `Retry-After` wait
    #[must_use]
    pub const fn with_max_retry_wait(mut self, max_wait: Duration) -> Self {
        self.max_retry_wait = max_wait;
        self
    }

    /// Value of the `fields` query parameter, `None` when unrestricted
    #[must_use]
    pub fn fields_param(&self) -> Option<String> {
        if self.fields.is_empty() {
            return None;
        }
        let mut fields = vec!["id".to_string()];
        fields.extend(self.fields.iter().filter(|f| *f != "id").cloned());
        Some(fields.join(","))
    }

    fn fetch_once(&self, page_index: usize, page_size: usize) -> (Result<FetchedPage>, Option<Duration>) {
        let mut query = vec![
            ("page", page_index.to_string()),
            ("limit", page_size.to_string()),
        ];
        if let Some(fields) = self.fields_param() {
            query.push(("fields", fields));
        }

        let response = match self.client.get(&self.base_url).query(&query).send() {
            Ok(response) => response,
            Err(e) => return (Err(FetchError::Http(e)), None),
        };

        let status = response.status();
        if !status.is_success() {
            let retry_after = if status == StatusCode::TOO_MANY_REQUESTS {
                parse_retry_after(&response)
            } else {
                None
            };
            return (
                Err(FetchError::Status {
                    status: status.as_u16(),
                    url: response.url().to_string(),
                }),
                retry_after,
            );
        }

        let result = response
            .text()
            .map_err(FetchError::Http)
            .and_then(|body| parse_page_response(&body));
        (result, None)
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch_page(&self, page_index: usize, page_size: usize) -> Result<FetchedPage> {
        if page_index == 0 || page_size == 0 {
            return Err(FetchError::InvalidRequest(format!(
                "page {page_index} of size {page_size}"
            )));
        }

        let mut backoff = self.initial_backoff;
        let mut attempt = 0;
        loop {
            attempt += 1;
            log::debug!("GET {} page={page_index} limit={page_size} (attempt {attempt})", self.base_url);

            let (result, retry_after) = self.fetch_once(page_index, page_size);
            match result {
                Ok(page) => return Ok(page),
                Err(e) if e.is_transient() && attempt <= self.max_retries => {
                    let wait = retry_after.map_or(backoff, |wait| wait.min(self.max_retry_wait));
                    log::warn!(
                        "Fetching page {page_index} failed (attempt {attempt}/{}): {e}, retrying in {wait:?}",
                        self.max_retries + 1
                    );
                    std::thread::sleep(wait);
                    backoff *= 2;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Parse a `Retry-After` header given in seconds
///
/// The caller caps the result; see [`HttpFetcher::with_max_retry_wait`].
fn parse_retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
