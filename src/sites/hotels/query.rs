use super::models::SearchCriteria;
use crate::ScraperResult;
use serde_json::{json, Value};
use url::Url;

const SITE: &str = "https://www.booking.com";
const AFFILIATE_ID: &str = "304142";

/// Selection set limited to the fields `Hotel::from_result` reads.
pub const FULL_SEARCH_QUERY: &str = r#"query FullSearch($input: SearchQueryInput!) {
  searchQueries {
    search(input: $input) {
      ... on SearchQueryOutput {
        pagination {
          nbResultsPerPage
          nbResultsTotal
          __typename
        }
        results {
          basicPropertyData {
            id
            location {
              address
              city
              countryCode
              __typename
            }
            photos {
              main {
                highResUrl { relativeUrl __typename }
                lowResUrl { relativeUrl __typename }
                highResJpegUrl { relativeUrl __typename }
                lowResJpegUrl { relativeUrl __typename }
                __typename
              }
              __typename
            }
            reviewScore: reviews {
              score: totalScore
              reviewCount: reviewsCount
              totalScoreTextTag { translation __typename }
              __typename
            }
            starRating {
              value
              symbol
              __typename
            }
            __typename
          }
          displayName {
            text
            __typename
          }
          mealPlanIncluded {
            mealPlanType
            text
            __typename
          }
          priceDisplayInfoIrene {
            displayPrice {
              amountPerStay { amount amountRounded amountUnformatted currency __typename }
              __typename
            }
            averagePricePerNight { amount amountRounded amountUnformatted currency __typename }
            __typename
          }
          __typename
        }
        __typename
      }
      __typename
    }
    __typename
  }
}"#;

/// Sixteen hex digits, the shape the site uses for page-view and request ids.
pub fn request_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..16].to_string()
}

/// Query string the search results page itself would carry.
fn search_page_params(criteria: &SearchCriteria) -> Vec<(&'static str, String)> {
    vec![
        ("ss", criteria.destination.search_string.clone()),
        ("efdco", "1".to_string()),
        ("aid", AFFILIATE_ID.to_string()),
        ("lang", "en-us".to_string()),
        ("sb", "1".to_string()),
        ("src_elem", "sb".to_string()),
        ("src", "index".to_string()),
        ("dest_id", criteria.destination.dest_id.to_string()),
        ("dest_type", criteria.destination.dest_type.to_lowercase()),
        ("checkin", criteria.checkin_iso()),
        ("checkout", criteria.checkout_iso()),
        ("group_adults", criteria.adults.to_string()),
        ("no_rooms", criteria.rooms.to_string()),
        ("group_children", criteria.children.to_string()),
    ]
}

pub fn search_url(endpoint: &str, criteria: &SearchCriteria) -> ScraperResult<Url> {
    let mut url = Url::parse(endpoint)?;
    url.query_pairs_mut()
        .extend_pairs(search_page_params(criteria));
    Ok(url)
}

fn results_page_url(criteria: &SearchCriteria) -> ScraperResult<Url> {
    let mut url = Url::parse(SITE)?.join("/searchresults.html")?;
    url.query_pairs_mut()
        .extend_pairs(search_page_params(criteria));
    Ok(url)
}

/// Headers the search page's GraphQL client sends.
pub fn search_headers(
    criteria: &SearchCriteria,
    pageview_id: &str,
) -> ScraperResult<Vec<(&'static str, String)>> {
    Ok(vec![
        ("accept", "*/*".to_string()),
        ("accept-language", "en-US,en;q=0.8".to_string()),
        ("apollographql-client-name", "b-search-web-searchresults_rust".to_string()),
        ("apollographql-client-version", "ABJNVZXB".to_string()),
        ("content-type", "application/json".to_string()),
        ("origin", SITE.to_string()),
        ("priority", "u=1, i".to_string()),
        ("referer", results_page_url(criteria)?.to_string()),
        ("sec-fetch-dest", "empty".to_string()),
        ("sec-fetch-mode", "cors".to_string()),
        ("sec-fetch-site", "same-origin".to_string()),
        ("x-booking-context-action-name", "searchresults_irene".to_string()),
        ("x-booking-context-aid", AFFILIATE_ID.to_string()),
        ("x-booking-dml-cluster", "rust".to_string()),
        ("x-booking-pageview-id", pageview_id.to_string()),
        ("x-booking-site-type-id", "2".to_string()),
        ("x-booking-topic", "capla_browser_b-search-web-searchresults".to_string()),
    ])
}

/// GraphQL `FullSearch` body for one stay. Filtering happens locally, so the
/// request asks for a single large unfiltered page.
pub fn build_search_payload(criteria: &SearchCriteria, request_id: &str) -> ScraperResult<Value> {
    let checkin = criteria.checkin_iso();
    let checkout = criteria.checkout_iso();
    let raw_query = results_page_url(criteria)?;
    let raw_query = match raw_query.query() {
        Some(q) => format!("{}?{}", raw_query.path(), q),
        None => raw_query.path().to_string(),
    };

    Ok(json!({
        "operationName": "FullSearch",
        "variables": {
            "input": {
                "acidCarouselContext": null,
                "childrenAges": [],
                "dates": {
                    "checkin": checkin,
                    "checkout": checkout,
                },
                "doAvailabilityCheck": false,
                "encodedAutocompleteMeta": null,
                "enableCampaigns": true,
                "filters": {},
                "flexibleDatesConfig": {
                    "broadDatesCalendar": {
                        "checkinMonths": [],
                        "los": [],
                        "startWeekdays": [],
                    },
                    "dateFlexUseCase": "DATE_RANGE",
                    "dateRangeCalendar": {
                        "checkin": [checkin],
                        "checkout": [checkout],
                    },
                },
                "forcedBlocks": null,
                "location": {
                    "searchString": criteria.destination.search_string,
                    "destType": criteria.destination.dest_type,
                    "destId": criteria.destination.dest_id,
                },
                "metaContext": {
                    "metaCampaignId": 0,
                    "externalTotalPrice": null,
                    "feedPrice": null,
                    "hotelCenterAccountId": null,
                    "rateRuleId": null,
                    "dragongateTraceId": null,
                    "pricingProductsTag": null,
                },
                "nbRooms": criteria.rooms,
                "nbAdults": criteria.adults,
                "nbChildren": criteria.children,
                "showAparthotelAsHotel": true,
                "needsRoomsMatch": false,
                "optionalFeatures": {
                    "forceArpExperiments": true,
                    "testProperties": false,
                },
                "pagination": {
                    "rowsPerPage": 1000,
                    "offset": 0,
                },
                "rawQueryForSession": raw_query,
                "referrerBlock": {
                    "blockName": "searchbox",
                },
                "sbCalendarOpen": true,
                "sorters": {
                    "selectedSorter": null,
                    "referenceGeoId": null,
                    "tripTypeIntentId": null,
                },
                "travelPurpose": 2,
                "seoThemeIds": [],
                "useSearchParamsFromSession": true,
                "merchInput": {
                    "testCampaignIds": [],
                },
                "webSearchContext": {
                    "reason": "CLIENT_SIDE_UPDATE",
                    "source": "SEARCH_RESULTS",
                    "outcome": "SEARCH_RESULTS",
                },
                "clientSideRequestId": request_id,
            },
        },
        "extensions": {},
        "query": FULL_SEARCH_QUERY,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HotelsConfig;
    use chrono::NaiveDate;

    fn criteria() -> SearchCriteria {
        SearchCriteria::new(
            NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 11, 4).unwrap(),
            &HotelsConfig::default(),
        )
    }

    #[test]
    fn payload_carries_dates_and_party() {
        let payload = build_search_payload(&criteria(), "86ed05d965d10150").unwrap();
        let input = &payload["variables"]["input"];

        assert_eq!(payload["operationName"], "FullSearch");
        assert_eq!(input["dates"]["checkin"], "2026-11-01");
        assert_eq!(input["dates"]["checkout"], "2026-11-04");
        assert_eq!(input["flexibleDatesConfig"]["dateRangeCalendar"]["checkin"][0], "2026-11-01");
        assert_eq!(input["location"]["destId"], 20144883);
        assert_eq!(input["location"]["destType"], "CITY");
        assert_eq!(input["nbAdults"], 2);
        assert_eq!(input["pagination"]["rowsPerPage"], 1000);
        assert_eq!(input["clientSideRequestId"], "86ed05d965d10150");
        assert!(input["rawQueryForSession"]
            .as_str()
            .unwrap()
            .starts_with("/searchresults.html?ss=Seattle"));
    }

    #[test]
    fn url_carries_search_params() {
        let url = search_url("https://www.booking.com/dml/graphql", &criteria()).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert!(pairs.contains(&("checkin".into(), "2026-11-01".into())));
        assert!(pairs.contains(&("dest_type".into(), "city".into())));
        assert!(pairs.contains(&("ss".into(), "Seattle, United States".into())));
    }

    #[test]
    fn headers_carry_pageview_id() {
        let headers = search_headers(&criteria(), "abc").unwrap();
        assert!(headers
            .iter()
            .any(|(k, v)| *k == "x-booking-pageview-id" && v == "abc"));
    }

    #[test]
    fn request_ids_are_sixteen_hex_digits() {
        let id = request_id();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, request_id());
    }
}
