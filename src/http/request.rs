use crate::ScraperResult;
use reqwest::Method;
use serde::Serialize;
use url::Url;

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: Url,
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            method: Method::GET,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: &str) -> ScraperResult<Self> {
        Ok(Self::new(Url::parse(url)?))
    }

    pub fn post(url: &str) -> ScraperResult<Self> {
        Ok(Self::new(Url::parse(url)?).with_method(Method::POST))
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn with_headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializes `payload` as the body. Does not touch `content-type`; the
    /// site header sets carry their own.
    pub fn with_json<T: Serialize>(self, payload: &T) -> ScraperResult<Self> {
        let body = serde_json::to_string(payload)?;
        Ok(self.with_body(body))
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}
