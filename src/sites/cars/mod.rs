//! Turo car search: record the search API call a real browser makes, then
//! repeat it over plain HTTP.

mod capture;
mod models;
pub mod replay;
pub mod report;

pub use capture::capture;
pub use models::{parse_cookie_header, CaptureSession, CapturedRequest};
pub use replay::{build_replay_request, fallback_payload, summarize, ResponseSummary};

use crate::config::CarsConfig;
use crate::scrapers::Scraper;
use crate::ScraperResult;
use log::{info, warn};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    pub status: u16,
    pub header_count: usize,
    pub body: String,
    /// Present for a 200 response with a JSON body
    pub summary: Option<ResponseSummary>,
}

pub struct CarSearch {
    scraper: Box<dyn Scraper>,
    config: CarsConfig,
}

impl CarSearch {
    pub fn new(scraper: Box<dyn Scraper>, config: CarsConfig) -> Self {
        Self { scraper, config }
    }

    pub fn config(&self) -> &CarsConfig {
        &self.config
    }

    pub async fn capture(&self) -> ScraperResult<CaptureSession> {
        capture(&self.config).await
    }

    /// Repeats the captured search request. `None` when the browser run
    /// never saw one.
    pub async fn replay(&self, session: &CaptureSession) -> ScraperResult<Option<ReplayOutcome>> {
        let Some(captured) = &session.search_request else {
            warn!("No search API request captured, nothing to replay");
            return Ok(None);
        };

        let today = chrono::Local::now().date_naive();
        let request = build_replay_request(captured, &session.cookies, &self.config, today)?;

        info!("Making request with captured data...");
        let response = self.scraper.fetch(request).await?;

        let summary = if response.status == 200 {
            serde_json::from_str::<Value>(&response.body)
                .ok()
                .map(|json| summarize(&json))
        } else {
            None
        };

        Ok(Some(ReplayOutcome {
            status: response.status,
            header_count: response.headers.len(),
            body: response.body,
            summary,
        }))
    }
}
