//! BiggerPockets forum: topic cards from a location listing, then the
//! replies of each topic from its JSON-LD block.

mod listing;
mod models;
mod replies;

pub use listing::parse_forum_posts;
pub use models::{ForumPost, Reply};
pub use replies::parse_post_replies;

use crate::config::ForumConfig;
use crate::http::HttpRequest;
use crate::scrapers::Scraper;
use crate::ScraperResult;
use log::{info, warn};
use regex::Regex;
use std::sync::LazyLock;

static COUNT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d[\d,]*").expect("static regex"));

/// First integer in a count label such as "12 replies" or "1,204".
pub fn parse_count(text: &str) -> Option<u64> {
    COUNT
        .find(text)
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
}

const PAGE_HEADERS: [(&str, &str); 8] = [
    (
        "accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8",
    ),
    ("accept-language", "en-US,en;q=0.7"),
    ("priority", "u=0, i"),
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "same-origin"),
    ("sec-fetch-user", "?1"),
    ("upgrade-insecure-requests", "1"),
];

pub struct ForumScraper {
    scraper: Box<dyn Scraper>,
    config: ForumConfig,
}

impl ForumScraper {
    pub fn new(scraper: Box<dyn Scraper>, config: ForumConfig) -> Self {
        Self { scraper, config }
    }

    fn page_request(&self, url: &str) -> ScraperResult<HttpRequest> {
        Ok(HttpRequest::get(url)?
            .with_headers(PAGE_HEADERS)
            .with_header("referer", self.config.referer.clone()))
    }

    /// Fetches the listing, applies the post limits, then visits each post
    /// that has a URL. A thread that cannot be fetched gets an empty reply
    /// list; only a failed listing fetch is an error.
    pub async fn run(&self) -> ScraperResult<Vec<ForumPost>> {
        let listing_url = self.config.listing_url()?;
        let response = self.scraper.fetch(self.page_request(listing_url.as_str())?).await?;
        if !response.is_success() {
            warn!(
                "Listing {} answered with status {}",
                listing_url, response.status
            );
        }

        let mut posts = self.select(parse_forum_posts(&response.body, &self.config));
        info!("Found {} posts", posts.len());

        for post in posts.iter_mut() {
            let Some(url) = post.url.clone() else {
                continue;
            };

            info!("Fetching replies for: {}", post.label());
            let fetched = match self.page_request(&url) {
                Ok(request) => self.scraper.fetch(request).await,
                Err(e) => Err(e),
            };

            match fetched {
                Ok(thread) => {
                    let replies = parse_post_replies(&thread.body);
                    info!("Found {} replies", replies.len());
                    post.replies = Some(replies);
                }
                Err(e) => {
                    warn!("Error fetching replies for {}: {}", url, e);
                    self.scraper.stats().record_skipped("forum thread");
                    post.replies = Some(Vec::new());
                }
            }
        }

        Ok(posts)
    }

    fn select(&self, posts: Vec<ForumPost>) -> Vec<ForumPost> {
        let min_replies = self.config.min_replies.unwrap_or(0);
        let selected = posts.into_iter().filter(|post| {
            min_replies == 0
                || post
                    .reply_count
                    .as_deref()
                    .and_then(parse_count)
                    .unwrap_or(0)
                    >= min_replies
        });

        match self.config.max_posts {
            Some(max) => selected.take(max).collect(),
            None => selected.collect(),
        }
    }
}

#[cfg(test)]
mod tests;
