use std::path::PathBuf;

use thiserror::Error;

/// Errors that end a watch
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to seek to end of {}: {source}", path.display())]
    Seek {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed line {line_number}: {source}")]
    Parse {
        line_number: u64,
        #[source]
        source: ParseError,
    },

    #[error("alert dispatcher stopped unexpectedly")]
    DispatcherClosed,
}

/// A line that does not fit the configured format
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("expected a token at index {index}, line has {found}")]
    MissingField { index: usize, found: usize },

    #[error("line does not match the configured pattern")]
    NoMatch,

    #[error("missing key `{0}`")]
    MissingKey(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// An unusable line format in the configuration
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("invalid pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    #[error("pattern has no named group `{0}`")]
    MissingGroup(&'static str),
}
