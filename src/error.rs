use thiserror::Error;

/// Failures talking to the incidents API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("Incident not found: {0}")]
    NotFound(String),

    #[error("Unexpected response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid API URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Rejected query parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Unknown sort field: {0}")]
    UnknownSortField(String),

    #[error("Unknown sort order: {0} (expected asc or desc)")]
    UnknownSortOrder(String),

    #[error("Page size {size} is not one of {allowed:?}")]
    PageSizeNotAllowed { size: u32, allowed: Vec<u32> },

    #[error("Unknown severity: {0}")]
    UnknownSeverity(String),

    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    #[error("At least one page size must be configured")]
    NoPageSizes,
}

pub type Result<T> = std::result::Result<T, ApiError>;
