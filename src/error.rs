use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Connection failure, timeout or a non-2xx status.
    #[error("network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The page did not have the shape we scrape for.
    #[error("parse error: {0}")]
    Parse(String),
    #[error("bad pattern: {0}")]
    Regex(#[from] regex::Error),
    #[error("cache codec error: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl Error {
    pub(crate) fn parse(what: impl std::fmt::Display) -> Self {
        Error::Parse(what.to_string())
    }
}

/// Selector parse errors borrow the selector text, so they are flattened to a string.
impl<'a> From<scraper::error::SelectorErrorKind<'a>> for Error {
    fn from(err: scraper::error::SelectorErrorKind<'a>) -> Self {
        Error::Parse(format!("bad selector: {err}"))
    }
}
