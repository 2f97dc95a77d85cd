pub mod config;
pub mod core;
pub mod http;
pub mod scrapers;
pub mod sites;
pub mod stats;

pub use config::AppConfig;
pub use core::{ScraperError, ScraperResult};
pub use http::{BrowserProfile, HttpRequest, HttpResponse};
pub use scrapers::{HttpScraper, Scraper};
pub use stats::StatsTracker;
