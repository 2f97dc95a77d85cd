use async_trait::async_trait;
use log::warn;
use reqwest::{header, Client, ClientBuilder};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use super::Scraper;
use crate::config::HttpConfig;
use crate::http::{BrowserProfile, HttpRequest, HttpResponse, ResponseType};
use crate::{ScraperError, ScraperResult, StatsTracker};

#[derive(Debug, Error)]
pub enum HttpScraperError {
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Invalid header name: {0}")]
    InvalidHeaderName(#[from] header::InvalidHeaderName),
    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] header::InvalidHeaderValue),
}

impl From<HttpScraperError> for ScraperError {
    fn from(err: HttpScraperError) -> Self {
        match err {
            HttpScraperError::HttpError(e) => ScraperError::HttpError(e),
            other => ScraperError::InvalidHeader(other.to_string()),
        }
    }
}

/// reqwest-backed scraper that sends every request with the headers of a
/// [`BrowserProfile`].
pub struct HttpScraper {
    client: Client,
    profile: BrowserProfile,
    timeout: Duration,
    stats: StatsTracker,
}

impl HttpScraper {
    pub fn new() -> Result<Self, HttpScraperError> {
        Self::from_config(&HttpConfig::default())
    }

    pub fn from_config(config: &HttpConfig) -> Result<Self, HttpScraperError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Self::build_client(config.profile, timeout, Vec::new())?;

        Ok(Self {
            client,
            profile: config.profile,
            timeout,
            stats: StatsTracker::new(),
        })
    }

    /// Adds default headers on top of the profile's. Later entries win.
    pub fn with_headers(mut self, headers: Vec<(&str, &str)>) -> Result<Self, HttpScraperError> {
        self.client = Self::build_client(self.profile, self.timeout, headers)?;
        Ok(self)
    }

    fn build_client(
        profile: BrowserProfile,
        timeout: Duration,
        extra: Vec<(&str, &str)>,
    ) -> Result<Client, HttpScraperError> {
        let mut header_map = header::HeaderMap::new();
        for (key, value) in profile.headers() {
            header_map.insert(
                header::HeaderName::from_static(key),
                header::HeaderValue::from_str(&value)?,
            );
        }
        for (key, value) in extra {
            let name = header::HeaderName::from_bytes(key.as_bytes())?;
            let value = header::HeaderValue::from_str(value)?;
            header_map.insert(name, value);
        }

        Ok(ClientBuilder::new()
            .default_headers(header_map)
            .timeout(timeout)
            .build()?)
    }

    /// Captured browser headers occasionally carry names reqwest refuses
    /// (HTTP/2 pseudo-headers and the like); those are dropped, not fatal.
    fn request_headers(request: &HttpRequest) -> header::HeaderMap {
        let mut header_map = header::HeaderMap::new();
        for (key, value) in &request.headers {
            let name = match header::HeaderName::from_bytes(key.as_bytes()) {
                Ok(name) => name,
                Err(e) => {
                    warn!("Dropping header {:?}: {}", key, e);
                    continue;
                }
            };
            match header::HeaderValue::from_str(value) {
                Ok(value) => {
                    header_map.insert(name, value);
                }
                Err(e) => warn!("Dropping header {:?}: {}", key, e),
            }
        }
        header_map
    }

    fn extract_headers(response: &reqwest::Response) -> HashMap<String, String> {
        response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|val| (k.to_string(), val.to_string())))
            .collect()
    }
}

#[async_trait]
impl Scraper for HttpScraper {
    async fn fetch_single(&self, request: HttpRequest) -> ScraperResult<HttpResponse> {
        let mut req = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(Self::request_headers(&request));

        if let Some(body) = request.body {
            req = req.body(body);
        }

        let response = req.send().await.map_err(HttpScraperError::HttpError)?;

        let url = response.url().clone();
        let status = response.status().as_u16();
        let headers = Self::extract_headers(&response);

        // Decodes by the declared charset; stray bytes become U+FFFD.
        let body = response.text().await.map_err(HttpScraperError::HttpError)?;

        let response_type = ResponseType::detect(&headers, &body);

        Ok(HttpResponse {
            url,
            status,
            headers,
            body,
            response_type,
        })
    }

    fn stats(&self) -> &StatsTracker {
        &self.stats
    }
}
