//! Shared test helpers: a fixture-backed HTTP client and a recording sink.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use http_client::HttpClient;
use http_types::{Request, Response, StatusCode};
use xspf_export::{DeliverySink, Result};

/// Serves canned bodies by exact URL; everything else is a 404.
#[derive(Debug, Default)]
pub struct FixtureClient {
    pages: HashMap<String, String>,
}

impl FixtureClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }
}

#[async_trait]
impl HttpClient for FixtureClient {
    async fn send(&self, req: Request) -> std::result::Result<Response, http_types::Error> {
        match self.pages.get(req.url().as_str()) {
            Some(body) => {
                let mut response = Response::new(StatusCode::Ok);
                response.set_body(body.as_str());
                Ok(response)
            }
            None => Ok(Response::new(StatusCode::NotFound)),
        }
    }
}

/// Captures delivered documents instead of writing files.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub deliveries: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait(?Send)]
impl DeliverySink for RecordingSink {
    async fn deliver(&self, filename: &str, body: &str) -> Result<()> {
        self.deliveries
            .lock()
            .unwrap()
            .push((filename.to_string(), body.to_string()));
        Ok(())
    }
}
