use std::io::SeekFrom;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use logwatch_alert::{AlertSender, NotificationError};
use logwatch_types::{AlertEvent, LogLine};

use crate::config::{MalformedLinePolicy, WatchConfig};
use crate::error::WatchError;
use crate::parser::LineParser;

/// Counters reported when a watch ends cleanly
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TailSummary {
    pub lines_read: u64,
    pub alerts_raised: u64,
    pub alerts_dropped: u64,
    pub malformed_skipped: u64,
}

/// Follows one log file from its end, like `tail -f`
pub struct LogTailer {
    config: WatchConfig,
    parser: LineParser,
    alerts: AlertSender,

    reader: BufReader<File>,

    /// Bytes of a line whose terminator has not been written yet
    pending: Vec<u8>,

    summary: TailSummary,
}

impl LogTailer {
    /// Open the file and position the cursor at its end
    ///
    /// Content already in the file is never reported.
    pub async fn open(
        config: WatchConfig,
        parser: LineParser,
        alerts: AlertSender,
    ) -> Result<Self, WatchError> {
        let mut file = File::open(&config.path)
            .await
            .map_err(|source| WatchError::Open {
                path: config.path.clone(),
                source,
            })?;

        let offset = file
            .seek(SeekFrom::End(0))
            .await
            .map_err(|source| WatchError::Seek {
                path: config.path.clone(),
                source,
            })?;

        info!(path = %config.path.display(), offset, "Watching log file");

        Ok(Self {
            config,
            parser,
            alerts,
            reader: BufReader::new(file),
            pending: Vec::new(),
            summary: TailSummary::default(),
        })
    }

    /// Follow the file until cancelled or a fatal error occurs
    ///
    /// Complete lines are processed back to back; the poll pause only
    /// happens once the reader has caught up, which is also the only point
    /// where cancellation is observed.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<TailSummary, WatchError> {
        loop {
            if let Some(line) = self.next_line().await? {
                self.process_line(&line)?;
                continue;
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }
        }

        info!(
            lines = self.summary.lines_read,
            alerts = self.summary.alerts_raised,
            dropped = self.summary.alerts_dropped,
            skipped = self.summary.malformed_skipped,
            "Stopped watching log file"
        );
        Ok(self.summary)
    }

    /// Read the next complete line, if one has been written
    async fn next_line(&mut self) -> Result<Option<LogLine>, WatchError> {
        self.reader
            .read_until(b'\n', &mut self.pending)
            .await
            .map_err(|source| WatchError::Read {
                path: self.config.path.clone(),
                source,
            })?;

        if !self.pending.ends_with(b"\n") {
            return Ok(None);
        }

        self.summary.lines_read += 1;
        let bytes = std::mem::take(&mut self.pending);
        let raw = String::from_utf8_lossy(&bytes).into_owned();
        Ok(Some(LogLine::new(self.summary.lines_read, raw)))
    }

    fn process_line(&mut self, line: &LogLine) -> Result<(), WatchError> {
        debug!(line = line.line_number, "Read line");

        let record = match self.parser.parse(&line.raw) {
            Ok(record) => record,
            Err(source) => match self.config.malformed_lines {
                MalformedLinePolicy::Skip => {
                    self.summary.malformed_skipped += 1;
                    warn!(line = line.line_number, "Skipping malformed line: {}", source);
                    return Ok(());
                }
                MalformedLinePolicy::Stop => {
                    return Err(WatchError::Parse {
                        line_number: line.line_number,
                        source,
                    });
                }
            },
        };

        if !record.is_server_error() {
            return Ok(());
        }

        warn!("Error detected: {}", line.raw);
        match self.alerts.send(AlertEvent::new(line, record)) {
            Ok(()) => self.summary.alerts_raised += 1,
            // Already logged by the sender; keep reading
            Err(NotificationError::QueueFull) => self.summary.alerts_dropped += 1,
            Err(_) => return Err(WatchError::DispatcherClosed),
        }

        Ok(())
    }
}
