use crate::http::BrowserProfile;
use crate::{ScraperError, ScraperResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Top-level configuration, loaded from an optional JSON file. Every field
/// has a default so a partial file (or none) is enough.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub forum: ForumConfig,
    pub hotels: HotelsConfig,
    pub cars: CarsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
    pub profile: BrowserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForumConfig {
    /// Site root; thread and profile hrefs are resolved against it
    pub base_url: String,
    /// Location slug of the forum listing
    pub location: String,
    pub conversion_id: Option<u32>,
    pub referer: String,
    pub max_posts: Option<usize>,
    pub min_replies: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Destination {
    pub search_string: String,
    pub dest_type: String,
    pub dest_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HotelsConfig {
    /// GraphQL endpoint of the search page
    pub endpoint: String,
    pub destination: Destination,
    pub adults: u32,
    pub rooms: u32,
    pub children: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CarsConfig {
    pub start_url: String,
    /// Requests to exactly this URL are captured
    pub target_url: String,
    pub search_text: String,
    pub headless: bool,
    pub chrome_executable: Option<PathBuf>,
    pub page_load_delay_ms: u64,
    pub click_delay_ms: u64,
    pub typing_delay_ms: u64,
    pub submit_delay_ms: u64,
    pub element_timeout_ms: u64,
    /// Used by the fallback payload when the captured body is unusable
    pub location_id: i64,
    pub driver_age: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            profile: BrowserProfile::default(),
        }
    }
}

impl Default for ForumConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.biggerpockets.com".to_string(),
            location: "houston-texas".to_string(),
            conversion_id: Some(8143),
            referer: "https://www.biggerpockets.com/search?term=Houston+Texas".to_string(),
            max_posts: None,
            min_replies: None,
        }
    }
}

impl Default for Destination {
    fn default() -> Self {
        Self {
            search_string: "Seattle, United States".to_string(),
            dest_type: "CITY".to_string(),
            dest_id: 20144883,
        }
    }
}

impl Default for HotelsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www.booking.com/dml/graphql".to_string(),
            destination: Destination::default(),
            adults: 2,
            rooms: 1,
            children: 0,
        }
    }
}

impl Default for CarsConfig {
    fn default() -> Self {
        Self {
            start_url: "https://turo.com".to_string(),
            target_url: "https://turo.com/api/v2/search".to_string(),
            search_text: "JFK".to_string(),
            headless: false,
            chrome_executable: None,
            page_load_delay_ms: 3_000,
            click_delay_ms: 1_000,
            typing_delay_ms: 2_000,
            submit_delay_ms: 5_000,
            element_timeout_ms: 10_000,
            location_id: 7904760,
            driver_age: 27,
        }
    }
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> ScraperResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| ScraperError::ConfigError(format!("{}: {}", path.display(), e)))
    }

    pub fn with_profile(mut self, profile: BrowserProfile) -> Self {
        self.http.profile = profile;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.http.timeout_secs = timeout_secs;
        self
    }
}

impl ForumConfig {
    pub fn listing_url(&self) -> ScraperResult<Url> {
        let mut url = Url::parse(&self.base_url)?.join("/forums")?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(id) = self.conversion_id {
                query.append_pair("conversion_id", &id.to_string());
            }
            query.append_pair("location", &self.location);
        }
        Ok(url)
    }

    /// Absolute URL for a site-relative href. An empty href yields the site
    /// root, mirroring how the listing links are concatenated.
    pub fn absolute(&self, href: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), href)
    }
}
