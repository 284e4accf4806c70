use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use logwatch_alert::AlertConfig;
use logwatch_tail::{
    DEFAULT_LOG_PATH, DEFAULT_POLL_INTERVAL, LineFormat, MalformedLinePolicy, WatchConfig,
};

use crate::cli::Args;

/// Contents of the config file; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    path: Option<PathBuf>,
    poll_interval_ms: Option<u64>,
    malformed_lines: Option<MalformedLinePolicy>,
    format: LineFormat,
    alert: AlertConfig,
}

/// Fully resolved settings: CLI flags over config file over defaults
#[derive(Debug)]
pub struct AppConfig {
    pub watch: WatchConfig,
    pub format: LineFormat,
    pub alert: AlertConfig,
}

impl AppConfig {
    pub fn load(args: &Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => read_config_file(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::merge(args, file))
    }

    fn merge(args: &Args, file: FileConfig) -> Self {
        let path = args
            .path
            .clone()
            .or(file.path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH));

        let poll_interval = args
            .poll_interval_ms
            .or(file.poll_interval_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        let malformed_lines = if args.skip_malformed {
            MalformedLinePolicy::Skip
        } else {
            file.malformed_lines.unwrap_or_default()
        };

        let mut alert = file.alert;
        if let Some(url) = &args.webhook_url {
            alert.webhook_url = Some(url.clone());
        }

        Self {
            watch: WatchConfig::new(path)
                .with_poll_interval(poll_interval)
                .with_malformed_lines(malformed_lines),
            format: file.format,
            alert,
        }
    }
}

fn read_config_file(path: &Path) -> Result<FileConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}
