use std::path::PathBuf;

/// Transport-level fault reported by a [`PageFetcher`](crate::scrapers::PageFetcher).
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Everything that can abort a scrape run
#[derive(Debug, thiserror::Error)]
pub enum ScoutError {
    /// A search parameter is outside its allowed range
    #[error("{name} must be between 0 and {max}, got {value}")]
    InvalidParameter {
        name: &'static str,
        value: u32,
        max: u32,
    },

    /// The health check could not reach the site at all
    #[error("site {url} is unreachable: {source}")]
    SiteUnreachable {
        url: String,
        #[source]
        source: TransportError,
    },

    /// The health check answered with something other than 200
    #[error("site {url} answered with status {status}")]
    UnexpectedStatus { url: String, status: u16 },

    /// The first results page carries no search options block
    #[error("no listings found, try other search parameters")]
    NoResults,

    /// A results page is missing an element the parser relies on
    #[error("failed to extract {field}: {detail}")]
    Extraction { field: &'static str, detail: String },

    /// A results page could not be fetched mid-run
    #[error("failed to fetch {url}: {source}")]
    PageUnreachable {
        url: String,
        #[source]
        source: TransportError,
    },

    /// A results page answered with a non-success status mid-run
    #[error("page {url} answered with status {status}")]
    PageStatus { url: String, status: u16 },

    #[error("failed to read search options from {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed search options: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("invalid search options: {0}")]
    ConfigInvalid(String),

    #[error("invalid selector {css}: {detail}")]
    Selector { css: &'static str, detail: String },

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ScoutError {
    pub(crate) fn extraction(field: &'static str, detail: impl Into<String>) -> Self {
        Self::Extraction {
            field,
            detail: detail.into(),
        }
    }
}
