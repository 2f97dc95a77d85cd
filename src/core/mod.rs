mod errors;

pub use errors::{ScraperError, ScraperResult};
