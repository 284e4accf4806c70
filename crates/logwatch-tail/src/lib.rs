//! Log tailing for logwatch
//!
//! This crate follows a growing log file, parses each new line and hands
//! server errors to the alert dispatcher.

mod config;
mod error;
mod parser;
mod tail;

pub use config::{
    DEFAULT_LOG_PATH, DEFAULT_POLL_INTERVAL, DEFAULT_STATUS_INDEX, LineFormat, MalformedLinePolicy,
    WatchConfig,
};
pub use error::{FormatError, ParseError, WatchError};
pub use parser::LineParser;
pub use tail::{LogTailer, TailSummary};

// Re-export types used in our public API
pub use logwatch_types::{AlertEvent, LogLine, ParsedRecord};
