pub mod http_scraper;
pub mod mock_scraper;

mod scraper;
pub use http_scraper::HttpScraper;
pub use mock_scraper::{MockResponse, MockScraper};
pub use scraper::Scraper;
