//! HTTP page fetching.
//!
//! Thin wrapper over any [`HttpClient`] implementation so tests can inject
//! fixture clients while the binary uses the native backend.

use std::sync::Arc;

use http_client::HttpClient;
use http_types::{Method, Request, Url};
use scraper::Html;

use crate::{ExportError, Result};

const USER_AGENT: &str = concat!("xspf-export/", env!("CARGO_PKG_VERSION"));

/// Fetches pages and parses them into [`Html`] documents.
#[derive(Clone)]
pub struct PageFetcher {
    client: Arc<dyn HttpClient + Send + Sync>,
}

impl PageFetcher {
    /// Create a fetcher over any HTTP client implementation.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use xspf_export::PageFetcher;
    ///
    /// let http_client = http_client::native::NativeClient::new();
    /// let fetcher = PageFetcher::new(Box::new(http_client));
    /// ```
    pub fn new(client: Box<dyn HttpClient + Send + Sync>) -> Self {
        Self {
            client: Arc::from(client),
        }
    }

    /// GET a URL and return the response body as text.
    ///
    /// Transport failures and non-success status codes both map to
    /// [`ExportError::Http`].
    pub async fn get_string(&self, url: &str) -> Result<String> {
        let parsed = url
            .parse::<Url>()
            .map_err(|e| ExportError::Http(format!("invalid URL {url}: {e}")))?;

        let mut request = Request::new(Method::Get, parsed);
        let _ = request.insert_header("User-Agent", USER_AGENT);

        log::debug!("GET {url}");
        let mut response = self
            .client
            .send(request)
            .await
            .map_err(|e| ExportError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ExportError::Http(format!(
                "GET {url} returned {}",
                response.status()
            )));
        }

        response
            .body_string()
            .await
            .map_err(|e| ExportError::Http(e.to_string()))
    }

    /// GET a URL and parse the body as an HTML document.
    pub async fn get_document(&self, url: &str) -> Result<Html> {
        let body = self.get_string(url).await?;
        Ok(Html::parse_document(&body))
    }
}

impl std::fmt::Debug for PageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFetcher").finish_non_exhaustive()
    }
}
