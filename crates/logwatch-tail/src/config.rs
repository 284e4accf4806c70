use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Default file to watch
pub const DEFAULT_LOG_PATH: &str = "access.log";

/// Default pause when the file has no new data
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Zero-based index of the status code in the default positional format
pub const DEFAULT_STATUS_INDEX: usize = 8;

/// What to do with a line the parser cannot read
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MalformedLinePolicy {
    /// End the watch with an error
    #[default]
    Stop,
    /// Log it and move on to the next line
    Skip,
}

/// Where the status code and upstream address live in a line
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LineFormat {
    /// Whitespace-separated tokens: status at `status_index`, upstream last
    Positional {
        #[serde(default = "default_status_index")]
        status_index: usize,
    },

    /// Regex with named groups `status` and `upstream`
    Pattern { regex: String },

    /// One JSON object per line
    Json {
        #[serde(default = "default_status_key")]
        status_key: String,
        #[serde(default = "default_upstream_key")]
        upstream_key: String,
    },
}

impl Default for LineFormat {
    fn default() -> Self {
        Self::Positional {
            status_index: DEFAULT_STATUS_INDEX,
        }
    }
}

fn default_status_index() -> usize {
    DEFAULT_STATUS_INDEX
}

fn default_status_key() -> String {
    "status".to_string()
}

fn default_upstream_key() -> String {
    "upstream_addr".to_string()
}

/// Settings for a single watch
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WatchConfig {
    pub path: PathBuf,
    pub poll_interval: Duration,
    pub malformed_lines: MalformedLinePolicy,
}

impl WatchConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            malformed_lines: MalformedLinePolicy::default(),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_malformed_lines(mut self, policy: MalformedLinePolicy) -> Self {
        self.malformed_lines = policy;
        self
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        format: LineFormat,
    }

    #[test]
    fn test_positional_default_index() {
        let w: Wrapper = toml::from_str("[format]\nkind = \"positional\"\n").unwrap();
        assert_eq!(w.format, LineFormat::default());
    }

    #[test]
    fn test_json_default_keys() {
        let w: Wrapper = toml::from_str("[format]\nkind = \"json\"\n").unwrap();
        assert_eq!(
            w.format,
            LineFormat::Json {
                status_key: "status".to_string(),
                upstream_key: "upstream_addr".to_string(),
            }
        );
    }

    #[test]
    fn test_pattern_requires_regex() {
        assert!(toml::from_str::<Wrapper>("[format]\nkind = \"pattern\"\n").is_err());
    }

    #[test]
    fn test_watch_config_defaults() {
        let config = WatchConfig::default();
        assert_eq!(config.path, PathBuf::from("access.log"));
        assert_eq!(config.poll_interval, Duration::from_millis(100));
        assert_eq!(config.malformed_lines, MalformedLinePolicy::Stop);
    }
}
