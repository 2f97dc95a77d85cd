use crate::http::{HttpRequest, HttpResponse};
use crate::{ScraperResult, StatsTracker};
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};

#[async_trait]
pub trait Scraper: Send + Sync {
    async fn fetch_single(&self, request: HttpRequest) -> ScraperResult<HttpResponse>;
    fn stats(&self) -> &StatsTracker;

    /// Sends `request` once and records the outcome. There is no retry: a
    /// failed request is reported to the caller as-is.
    async fn fetch(&self, request: HttpRequest) -> ScraperResult<HttpResponse> {
        let start_time = Utc::now();
        let url = request.url.clone();
        info!("{} {}", request.method, url);

        match self.fetch_single(request).await {
            Ok(response) => {
                debug!(
                    "Received response: status={}, body_length={}, type={:?}",
                    response.status,
                    response.body.len(),
                    response.response_type
                );
                let duration = Utc::now().signed_duration_since(start_time);
                self.stats()
                    .record_request(response.status, response.body.len(), duration);
                Ok(response)
            }
            Err(e) => {
                warn!("Request to {} failed: {}", url, e);
                self.stats().record_failure();
                Err(e)
            }
        }
    }
}
