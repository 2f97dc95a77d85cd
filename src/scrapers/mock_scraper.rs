use crate::http::{HttpRequest, HttpResponse, ResponseType};
use crate::{ScraperError, ScraperResult, StatsTracker};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use super::Scraper;

#[derive(Clone, Debug)]
pub enum MockResponse {
    Respond { status: u16, body: String },
    /// Fail as if the connection had been refused.
    Fail(String),
}

impl MockResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        MockResponse::Respond {
            status: 200,
            body: body.into(),
        }
    }
}

/// Canned responses keyed by exact URL. Every request it receives is kept
/// so tests can assert on what was sent.
#[derive(Clone, Default)]
pub struct MockScraper {
    responses: Arc<HashMap<String, MockResponse>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    stats: StatsTracker,
}

impl MockScraper {
    pub fn new(responses: Vec<(&str, MockResponse)>) -> Self {
        Self {
            responses: Arc::new(
                responses
                    .into_iter()
                    .map(|(url, response)| (url.to_string(), response))
                    .collect(),
            ),
            requests: Arc::new(Mutex::new(Vec::new())),
            stats: StatsTracker::new(),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Scraper for MockScraper {
    async fn fetch_single(&self, request: HttpRequest) -> ScraperResult<HttpResponse> {
        self.requests.lock().push(request.clone());

        match self.responses.get(request.url.as_str()) {
            Some(MockResponse::Respond { status, body }) => {
                let headers = HashMap::new();
                Ok(HttpResponse {
                    url: request.url,
                    status: *status,
                    response_type: ResponseType::detect(&headers, body),
                    headers,
                    body: body.clone(),
                })
            }
            Some(MockResponse::Fail(message)) => Err(ScraperError::IoError(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                message.clone(),
            ))),
            None => Err(ScraperError::ExtractionError(format!(
                "no mock response for {}",
                request.url
            ))),
        }
    }

    fn stats(&self) -> &StatsTracker {
        &self.stats
    }
}
