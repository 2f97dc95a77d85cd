use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Extraction error: {0}")]
    ExtractionError(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Request failed with status code {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Input error: {0}")]
    InputError(String),

    #[error("Browser error: {0}")]
    BrowserError(String),

    #[error("Config error: {0}")]
    ConfigError(String),
}

impl From<chromiumoxide::error::CdpError> for ScraperError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        ScraperError::BrowserError(err.to_string())
    }
}

pub type ScraperResult<T> = Result<T, ScraperError>;
