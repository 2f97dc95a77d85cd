use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// A request observed in the browser, kept verbatim for replay.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CapturedRequest {
    pub url: String,
    pub method: String,
    pub headers: BTreeMap<String, String>,
    /// Parsed from the request's own `Cookie` header
    pub cookies: BTreeMap<String, String>,
    pub post_data: Option<String>,
}

/// Everything one browser run produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CaptureSession {
    /// Most recent request to the target URL
    pub search_request: Option<CapturedRequest>,
    pub requests: Vec<CapturedRequest>,
    /// Union of the headers of every captured target request
    pub headers: BTreeMap<String, String>,
    /// Browser cookie jar at the end of the run
    pub cookies: BTreeMap<String, String>,
}

/// `a=1; b=2` into a map. Pairs without `=` are skipped; values may
/// themselves contain `=`.
pub fn parse_cookie_header(header: &str) -> BTreeMap<String, String> {
    header
        .split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| pair.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}

fn header_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl CapturedRequest {
    /// Builds a record from a CDP `Network.Request` object as JSON.
    pub fn from_cdp_request(request: &Value) -> Option<Self> {
        let url = request.get("url")?.as_str()?.to_string();
        let method = request
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or("GET")
            .to_string();

        let headers: BTreeMap<String, String> = request
            .get("headers")
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .map(|(k, v)| (k.clone(), header_value(v)))
                    .collect()
            })
            .unwrap_or_default();

        let cookies = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("cookie"))
            .map(|(_, v)| parse_cookie_header(v))
            .unwrap_or_default();

        let post_data = request
            .get("postData")
            .and_then(Value::as_str)
            .map(str::to_string);

        Some(Self {
            url,
            method,
            headers,
            cookies,
            post_data,
        })
    }
}

impl CaptureSession {
    /// Records `request` if it targets `target`. Returns whether it did.
    pub fn record(&mut self, target: &str, request: CapturedRequest) -> bool {
        if request.url != target {
            return false;
        }
        self.headers
            .extend(request.headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.requests.push(request.clone());
        self.search_request = Some(request);
        true
    }
}
