use thiserror::Error;

/// Price or mileage text did not match the extraction grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty price text")]
    EmptyPrice,
    #[error("invalid price: {text:?}")]
    InvalidPrice { text: String },
    #[error("mileage not found: {text:?}")]
    MileageNotFound { text: String },
    #[error("invalid mileage: {text:?}")]
    InvalidMileage { text: String },
}

/// Reasons a single listing is discarded. Never fatal for the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("zero price: {text:?}")]
    ZeroPrice { text: String },
    #[error("mileage {mileage} km exceeds every segment")]
    ClassificationMiss { mileage: u32 },
}

/// A target page could not be retrieved. Ends that target's run only.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url {url:?}")]
    InvalidUrl { url: String },
    #[error("domain not allowed: {host}")]
    DomainNotAllowed { host: String },
    #[error("HTTP {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
