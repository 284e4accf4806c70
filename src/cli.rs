use std::path::PathBuf;

use clap::Parser;

/// logwatch - Follow an access log and alert on server errors
#[derive(Parser, Debug)]
#[command(name = "logwatch")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Log file to follow (default: access.log)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Pause between reads once the end of the file is reached
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,

    /// Slack-style incoming webhook; alerts are printed when unset
    #[arg(long, value_name = "URL")]
    pub webhook_url: Option<String>,

    /// Skip lines that cannot be parsed instead of stopping
    #[arg(long)]
    pub skip_malformed: bool,
}
