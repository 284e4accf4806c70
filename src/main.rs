mod cli;
mod config;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;

use logwatch_alert::alert_channel_with_capacity;
use logwatch_tail::{LineParser, LogTailer};

use crate::cli::Args;
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", fatal_message(&e));
            ExitCode::FAILURE
        }
    }
}

/// Operator-facing report for an error that ended the watch
fn fatal_message(err: &anyhow::Error) -> String {
    format!("Error monitoring logs: {:#}", err)
}

async fn run(args: Args) -> Result<()> {
    let config = AppConfig::load(&args)?;

    let parser = LineParser::new(&config.format).context("invalid line format")?;
    let sink = config
        .alert
        .build_sink()
        .context("failed to set up alert sink")?;
    info!(sink = sink.name(), "Alerts enabled");

    let (sender, dispatcher) = alert_channel_with_capacity(
        sink,
        config.alert.retry_strategy(),
        config.alert.queue_capacity,
    );
    let dispatcher = tokio::spawn(dispatcher.run());

    // The tailer owns the only sender; once it stops, the dispatcher drains and exits
    let tailer = match LogTailer::open(config.watch, parser, sender).await {
        Ok(tailer) => tailer,
        Err(e) => {
            dispatcher.await.context("alert dispatcher panicked")?;
            return Err(e.into());
        }
    };

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received Ctrl+C, stopping watcher");
                cancel.cancel();
            }
        }
    });

    let result = tailer.run(cancel).await;
    dispatcher.await.context("alert dispatcher panicked")?;

    let summary = result?;
    info!(
        lines = summary.lines_read,
        alerts = summary.alerts_raised,
        "Watcher stopped"
    );
    Ok(())
}
