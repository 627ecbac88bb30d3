//! Transport used for fragments, stylesheets and API requests.
//!
//! `Fetcher` is the seam between the router and the network. `HttpFetcher`
//! talks HTTP through reqwest; `MemoryFetcher` serves a fixed table and is
//! what the tests and the benchmark drive the router with.

use crate::{Error, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Status and body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Retrieves a resource by path. Relative paths are resolved by the
/// implementation; absolute URLs are used as-is.
pub trait Fetcher: Send + Sync {
    fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Response>>;
}

#[cfg(feature = "http")]
pub use http::HttpFetcher;

#[cfg(feature = "http")]
mod http {
    use super::*;
    use url::Url;

    /// reqwest-backed fetcher resolving relative paths against a base URL
    pub struct HttpFetcher {
        client: reqwest::Client,
        base: Url,
        user_agent: String,
        timeout_ms: u64,
    }

    impl HttpFetcher {
        pub fn new(base_url: &str, user_agent: &str, timeout_ms: u64) -> Result<Self> {
            let base = Url::parse(base_url).map_err(|e| {
                Error::ConfigError(format!("invalid base URL {}: {}", base_url, e))
            })?;
            let client = reqwest::Client::builder()
                .timeout(Duration::from_millis(timeout_ms))
                .build()
                .map_err(|e| {
                    Error::InitializationError(format!("Failed to build HTTP client: {}", e))
                })?;
            Ok(Self {
                client,
                base,
                user_agent: user_agent.to_string(),
                timeout_ms,
            })
        }

        pub fn resolve(&self, path: &str) -> Result<Url> {
            self.base
                .join(path)
                .map_err(|e| Error::Network(format!("cannot resolve {}: {}", path, e)))
        }
    }

    impl Fetcher for HttpFetcher {
        fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Response>> {
            async move {
                let url = self.resolve(path)?;
                log::debug!("GET {}", url);
                let resp = self
                    .client
                    .get(url.clone())
                    .header("User-Agent", self.user_agent.as_str())
                    .send()
                    .await
                    .map_err(|e| {
                        if e.is_timeout() {
                            Error::Timeout(self.timeout_ms)
                        } else {
                            Error::Network(format!("GET {} failed: {}", url, e))
                        }
                    })?;
                let status = resp.status().as_u16();
                let body = resp.text().await.map_err(|e| {
                    Error::Network(format!("Failed to read response body: {}", e))
                })?;
                Ok(Response { status, body })
            }
            .boxed()
        }
    }
}

#[derive(Debug, Clone)]
enum Entry {
    Respond { response: Response, delay: Duration },
    Fail(String),
}

/// In-memory fetcher keyed by the exact path string.
///
/// Unknown paths answer 404. Every requested path is recorded so callers can
/// assert on request order.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    entries: Mutex<HashMap<String, Entry>>,
    requests: Mutex<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(self, path: &str, status: u16, body: &str) -> Self {
        self.insert(path, status, body);
        self
    }

    pub fn insert(&self, path: &str, status: u16, body: &str) {
        self.insert_delayed(path, status, body, Duration::ZERO);
    }

    /// Answer `path` only after `delay` has elapsed
    pub fn insert_delayed(&self, path: &str, status: u16, body: &str, delay: Duration) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                path.to_string(),
                Entry::Respond {
                    response: Response::new(status, body),
                    delay,
                },
            );
    }

    /// Make `path` fail with a network error
    pub fn insert_failure(&self, path: &str, reason: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_string(), Entry::Fail(reason.to_string()));
    }

    /// Paths requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Fetcher for MemoryFetcher {
    fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Response>> {
        async move {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(path.to_string());
            let entry = self
                .entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(path)
                .cloned();
            match entry {
                Some(Entry::Respond { response, delay }) => {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    Ok(response)
                }
                Some(Entry::Fail(reason)) => Err(Error::Network(reason)),
                None => Ok(Response::new(404, "Not Found")),
            }
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range() {
        assert!(Response::new(200, "").is_success());
        assert!(Response::new(204, "").is_success());
        assert!(!Response::new(304, "").is_success());
        assert!(!Response::new(404, "").is_success());
    }

    #[tokio::test]
    async fn memory_fetcher_serves_table_and_records_requests() {
        let f = MemoryFetcher::new().with("pages/home.html", 200, "<p>hi</p>");
        f.insert_failure("down", "connection refused");

        let ok = f.get("pages/home.html").await.unwrap();
        assert_eq!(ok.body, "<p>hi</p>");
        assert_eq!(f.get("nope").await.unwrap().status, 404);
        assert!(matches!(f.get("down").await, Err(Error::Network(_))));
        assert_eq!(f.requests(), vec!["pages/home.html", "nope", "down"]);
    }

    #[cfg(feature = "http")]
    #[test]
    fn http_fetcher_resolves_relative_candidates() {
        let f = HttpFetcher::new("http://localhost:8080/site/", "folio-test", 1000).unwrap();
        assert_eq!(
            f.resolve("./pages/css/home.css").unwrap().as_str(),
            "http://localhost:8080/site/pages/css/home.css"
        );
        assert_eq!(
            f.resolve("/pages/css/home.css").unwrap().as_str(),
            "http://localhost:8080/pages/css/home.css"
        );
        assert_eq!(
            f.resolve("../pages/css/home.css").unwrap().as_str(),
            "http://localhost:8080/pages/css/home.css"
        );
        assert_eq!(
            f.resolve("https://api.example.com/posts?_limit=2").unwrap().as_str(),
            "https://api.example.com/posts?_limit=2"
        );
    }

    #[cfg(feature = "http")]
    #[test]
    fn http_fetcher_rejects_bad_base() {
        assert!(matches!(
            HttpFetcher::new("not a url", "ua", 1000),
            Err(Error::ConfigError(_))
        ));
    }
}
