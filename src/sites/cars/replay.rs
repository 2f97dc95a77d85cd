use super::models::CapturedRequest;
use crate::config::CarsConfig;
use crate::http::HttpRequest;
use crate::ScraperResult;
use chrono::{Duration, NaiveDate, NaiveTime};
use log::{info, warn};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;

const ESSENTIAL_HEADERS: [(&str, &str); 7] = [
    ("accept", "*/*"),
    ("accept-language", "en-US,en;q=0.8"),
    ("content-type", "application/json"),
    ("origin", "https://turo.com"),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-origin"),
];

/// Set by the HTTP client itself; replaying the captured values breaks the
/// request.
const DROPPED_HEADERS: [&str; 4] = ["content-length", "host", "connection", "accept-encoding"];

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";
const ITEM_FIELDS: [&str; 7] = ["id", "name", "make", "model", "year", "price", "dailyPrice"];
const ITEM_ARRAYS: [&str; 4] = ["results", "data", "vehicles", "cars"];
const PAGING_OBJECTS: [&str; 3] = ["pagination", "meta", "paging"];
const PAGING_FIELDS: [&str; 5] = ["total", "count", "page", "limit", "totalPages"];
const PREVIEW_ITEMS: usize = 3;
const PREVIEW_FIELDS: usize = 4;

/// Search body used when the browser run yielded no usable post data.
/// Pickup a week from `today` at 10:00, returned four days later.
pub fn fallback_payload(config: &CarsConfig, today: NaiveDate) -> Value {
    let ten = NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default();
    let start = (today + Duration::days(7)).and_time(ten);
    let end = start + Duration::days(4);

    json!({
        "filters": {
            "location": {
                "country": "US",
                "type": "poi",
                "locationId": config.location_id,
                "pickupType": "ALL"
            },
            "age": config.driver_age,
            "engines": [],
            "makes": [],
            "models": [],
            "dates": {
                "end": end.format(DATE_FORMAT).to_string(),
                "start": start.format(DATE_FORMAT).to_string()
            },
            "tmvTiers": [],
            "features": [],
            "types": []
        },
        "sorts": {"direction": "ASC", "type": "RELEVANCE"}
    })
}

/// Captured headers minus the client-managed ones, plus any essential header
/// that has no case-insensitive match.
pub fn replay_headers(captured: &BTreeMap<String, String>) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = captured
        .iter()
        .filter(|(k, _)| !DROPPED_HEADERS.iter().any(|d| k.eq_ignore_ascii_case(d)))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    for (key, value) in ESSENTIAL_HEADERS {
        if !headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(key)) {
            headers.push((key.to_string(), value.to_string()));
        }
    }
    headers
}

fn payload(captured: &CapturedRequest, config: &CarsConfig, today: NaiveDate) -> Value {
    match captured.post_data.as_deref() {
        Some(raw) => match serde_json::from_str(raw) {
            Ok(data) => {
                info!("Using exact POST data from captured request");
                data
            }
            Err(e) => {
                warn!("Could not parse captured POST data ({}), using fallback", e);
                fallback_payload(config, today)
            }
        },
        None => {
            warn!("No POST data captured, using fallback");
            fallback_payload(config, today)
        }
    }
}

/// Builds the POST that repeats the captured search outside the browser.
/// A non-empty browser cookie jar replaces any captured `Cookie` header.
pub fn build_replay_request(
    captured: &CapturedRequest,
    cookies: &BTreeMap<String, String>,
    config: &CarsConfig,
    today: NaiveDate,
) -> ScraperResult<HttpRequest> {
    let mut headers = replay_headers(&captured.headers);
    info!("Using {} headers from captured search API request", headers.len());

    if cookies.is_empty() {
        warn!("No cookies captured, proceeding without cookies");
    } else {
        info!("Using {} cookies from browser session", cookies.len());
        headers.retain(|(k, _)| !k.eq_ignore_ascii_case("cookie"));
        let jar = cookies
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("; ");
        headers.push(("cookie".to_string(), jar));
    }

    HttpRequest::post(&config.target_url)?
        .with_headers(headers)
        .with_json(&payload(captured, config, today))
}

/// Shape of a JSON value, as shown in the response summary.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    Array(usize),
    Object(usize),
    Scalar(&'static str),
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Array(items) => Self::Array(items.len()),
            Value::Object(map) => Self::Object(map.len()),
            Value::String(_) => Self::Scalar("string"),
            Value::Number(_) => Self::Scalar("number"),
            Value::Bool(_) => Self::Scalar("boolean"),
            Value::Null => Self::Scalar("null"),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array(n) => write!(f, "array with {} items", n),
            Self::Object(n) => write!(f, "object with {} keys", n),
            Self::Scalar(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemPreview {
    /// Name of the array the items came from
    pub source: String,
    /// 1-based position and `field: value` pairs, for object items only
    pub items: Vec<(usize, Vec<String>)>,
    pub remaining: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseSummary {
    Object {
        keys: Vec<(String, ValueKind)>,
        preview: Option<ItemPreview>,
        pagination: Option<Vec<(String, String)>>,
    },
    Array {
        len: usize,
        first: Option<ValueKind>,
    },
    Scalar(ValueKind),
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn item_preview(map: &serde_json::Map<String, Value>) -> Option<ItemPreview> {
    let (source, items) = ITEM_ARRAYS
        .iter()
        .find_map(|key| map.get(*key)?.as_array().map(|items| (*key, items)))?;

    let previews = items
        .iter()
        .take(PREVIEW_ITEMS)
        .enumerate()
        .filter_map(|(i, item)| {
            let obj = item.as_object()?;
            let fields = ITEM_FIELDS
                .iter()
                .filter_map(|field| obj.get(*field).map(|v| format!("{}: {}", field, display_value(v))))
                .take(PREVIEW_FIELDS)
                .collect();
            Some((i + 1, fields))
        })
        .collect();

    Some(ItemPreview {
        source: source.to_string(),
        items: previews,
        remaining: items.len().saturating_sub(PREVIEW_ITEMS),
    })
}

fn pagination(map: &serde_json::Map<String, Value>) -> Option<Vec<(String, String)>> {
    let paging = PAGING_OBJECTS
        .iter()
        .find_map(|key| map.get(*key)?.as_object())?;
    Some(
        PAGING_FIELDS
            .iter()
            .filter_map(|field| paging.get(*field).map(|v| (field.to_string(), display_value(v))))
            .collect(),
    )
}

/// Condenses a search response into its shape plus a few sample items.
pub fn summarize(response: &Value) -> ResponseSummary {
    match response {
        Value::Object(map) => ResponseSummary::Object {
            keys: map
                .iter()
                .map(|(k, v)| (k.clone(), ValueKind::of(v)))
                .collect(),
            preview: item_preview(map),
            pagination: pagination(map),
        },
        Value::Array(items) => ResponseSummary::Array {
            len: items.len(),
            first: items.first().map(ValueKind::of),
        },
        other => ResponseSummary::Scalar(ValueKind::of(other)),
    }
}

impl fmt::Display for ResponseSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object {
                keys,
                preview,
                pagination,
            } => {
                writeln!(f, "Response contains {} top-level keys:", keys.len())?;
                for (key, kind) in keys {
                    writeln!(f, "  - {}: {}", key, kind)?;
                }
                if let Some(preview) = preview {
                    writeln!(f)?;
                    writeln!(f, "First {} items from '{}' array:", PREVIEW_ITEMS, preview.source)?;
                    for (position, fields) in &preview.items {
                        writeln!(f, "  {}. {}", position, fields.join(", "))?;
                    }
                    if preview.remaining > 0 {
                        writeln!(f, "  ... and {} more items", preview.remaining)?;
                    }
                }
                if let Some(fields) = pagination {
                    writeln!(f)?;
                    writeln!(f, "Pagination info:")?;
                    for (field, value) in fields {
                        writeln!(f, "  - {}: {}", field, value)?;
                    }
                }
                Ok(())
            }
            Self::Array { len, first } => {
                writeln!(f, "Response is an array with {} items", len)?;
                if let Some(kind) = first {
                    writeln!(f, "  First item type: {}", kind)?;
                }
                Ok(())
            }
            Self::Scalar(kind) => writeln!(f, "Response is a single {}", kind),
        }
    }
}
