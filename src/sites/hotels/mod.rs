//! Booking.com hotel search through the search page's GraphQL endpoint.

mod filter;
mod models;
mod parser;
pub mod prompt;
mod query;
pub mod report;

pub use filter::{sort_hotels, HotelFilter, SortOrder};
pub use models::{validate_stay, GuestRating, Hotel, HotelLocation, Pricing, SearchCriteria};
pub use parser::{extract_results, format_image_url};
pub use query::{build_search_payload, search_headers, search_url, FULL_SEARCH_QUERY};

use crate::config::HotelsConfig;
use crate::http::HttpRequest;
use crate::scrapers::Scraper;
use crate::{ScraperError, ScraperResult};
use log::{info, warn};
use serde_json::Value;

const ERROR_PREVIEW_CHARS: usize = 500;

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Results the site returned before filtering
    pub found: usize,
    pub hotels: Vec<Hotel>,
}

pub struct HotelSearch {
    scraper: Box<dyn Scraper>,
    config: HotelsConfig,
}

impl HotelSearch {
    pub fn new(scraper: Box<dyn Scraper>, config: HotelsConfig) -> Self {
        Self { scraper, config }
    }

    pub fn criteria(&self, checkin: chrono::NaiveDate, checkout: chrono::NaiveDate) -> SearchCriteria {
        SearchCriteria::new(checkin, checkout, &self.config)
    }

    pub async fn run(&self, criteria: &SearchCriteria) -> ScraperResult<SearchOutcome> {
        let request_id = query::request_id();
        let request = HttpRequest::post(search_url(&self.config.endpoint, criteria)?.as_str())?
            .with_headers(search_headers(criteria, &request_id)?)
            .with_json(&build_search_payload(criteria, &request_id)?)?;

        let response = self.scraper.fetch(request).await?;
        info!("Response Status Code: {}", response.status);

        if response.status != 200 {
            return Err(ScraperError::UnexpectedStatus {
                status: response.status,
                body: response.body_preview(ERROR_PREVIEW_CHARS),
            });
        }

        let json: Value = response.json()?;
        let results = extract_results(&json);
        info!("Found {} hotels", results.len());

        let mut hotels = Vec::with_capacity(results.len());
        for result in results {
            match Hotel::from_result(result) {
                Ok(hotel) => hotels.push(hotel),
                Err(e) => {
                    warn!("Skipping search result: {}", e);
                    self.scraper.stats().record_skipped("hotel result");
                }
            }
        }

        let mut hotels = criteria.filter.apply(hotels);
        sort_hotels(&mut hotels, criteria.sort);
        info!("Showing {} hotels matching your criteria", hotels.len());

        Ok(SearchOutcome {
            found: results.len(),
            hotels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::HttpScraper;
    use chrono::NaiveDate;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn search(server: &MockServer) -> HotelSearch {
        let config = HotelsConfig {
            endpoint: format!("{}/dml/graphql", server.uri()),
            ..HotelsConfig::default()
        };
        HotelSearch::new(Box::new(HttpScraper::new().unwrap()), config)
    }

    fn stay(search: &HotelSearch) -> SearchCriteria {
        search.criteria(
            NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 11, 4).unwrap(),
        )
    }

    fn results_body() -> Value {
        json!({"data": {"searchQueries": {"search": {"results": [
            {
                "basicPropertyData": {"starRating": {"value": 3}, "reviewScore": {"score": 7.9, "reviewCount": 40}},
                "displayName": {"text": "Cheap Sleep"},
                "priceDisplayInfoIrene": {"averagePricePerNight": {"amount": "US$90", "amountUnformatted": 90}}
            },
            "not a hotel",
            {
                "basicPropertyData": {"starRating": {"value": 5}, "reviewScore": {"score": 9.2, "reviewCount": 800}},
                "displayName": {"text": "Grand Palace"},
                "priceDisplayInfoIrene": {"averagePricePerNight": {"amount": "US$610", "amountUnformatted": 610}}
            },
            {
                "basicPropertyData": {"starRating": {"value": 4}},
                "displayName": {"text": "Mystery Price"}
            }
        ]}}}})
    }

    #[tokio::test]
    async fn posts_full_search_and_filters_results() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dml/graphql"))
            .and(query_param("checkin", "2026-11-01"))
            .and(header("apollographql-client-name", "b-search-web-searchresults_rust"))
            .and(body_partial_json(json!({
                "operationName": "FullSearch",
                "variables": {"input": {"dates": {"checkin": "2026-11-01", "checkout": "2026-11-04"}}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(results_body()))
            .mount(&server)
            .await;

        let search = search(&server);
        let criteria = stay(&search)
            .with_filter(HotelFilter {
                max_price: Some(200),
                ..HotelFilter::default()
            })
            .with_sort(SortOrder::NameAsc);

        let outcome = search.run(&criteria).await.unwrap();

        assert_eq!(outcome.found, 4);
        let names: Vec<_> = outcome.hotels.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, ["Cheap Sleep", "Mystery Price"]);
    }

    #[tokio::test]
    async fn non_200_is_an_error_with_preview() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dml/graphql"))
            .respond_with(ResponseTemplate::new(403).set_body_string("x".repeat(2_000)))
            .mount(&server)
            .await;

        let search = search(&server);
        match search.run(&stay(&search)).await {
            Err(ScraperError::UnexpectedStatus { status, body }) => {
                assert_eq!(status, 403);
                assert_eq!(body.len(), 500);
            }
            other => panic!("expected UnexpectedStatus, got {:?}", other.map(|o| o.found)),
        }
    }

    #[tokio::test]
    async fn invalid_json_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>captcha</html>"))
            .mount(&server)
            .await;

        let search = search(&server);
        assert!(matches!(
            search.run(&stay(&search)).await,
            Err(ScraperError::JsonError(_))
        ));
    }

    #[tokio::test]
    async fn missing_results_path_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
            .mount(&server)
            .await;

        let search = search(&server);
        let outcome = search.run(&stay(&search)).await.unwrap();
        assert_eq!(outcome.found, 0);
        assert!(outcome.hotels.is_empty());
    }
}
