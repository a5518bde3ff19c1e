use std::io::Write;
use std::str::FromStr;

use tokio::sync::broadcast;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use tracing_subscriber::fmt::MakeWriter;

pub(crate) const LOG_LEVEL_ENV: &str = "HUGAI_LOG";

/// Tees every formatted log line into a broadcast channel (the `/api/logs`
/// tail) and, unless suppressed, to stderr.
#[derive(Clone)]
pub(crate) struct LogMakeWriter {
    pub sender: broadcast::Sender<String>,
    pub suppress_stderr: bool,
}

impl<'a> MakeWriter<'a> for LogMakeWriter {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            sender: self.sender.clone(),
            suppress_stderr: self.suppress_stderr,
        }
    }
}

pub(crate) struct LogWriter {
    sender: broadcast::Sender<String>,
    suppress_stderr: bool,
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let msg = String::from_utf8_lossy(buf).to_string();
        let _ = self.sender.send(msg); // Ignored if no receivers
        if !self.suppress_stderr {
            std::io::stderr().write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if !self.suppress_stderr {
            std::io::stderr().flush()?;
        }
        Ok(())
    }
}

pub(crate) fn level_from_env() -> Level {
    std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|v| Level::from_str(v.trim()).ok())
        .unwrap_or(Level::INFO)
}

/// Installs the global subscriber and returns the log channel.
pub(crate) fn init(suppress_stderr: bool) -> broadcast::Sender<String> {
    let (log_tx, _) = broadcast::channel::<String>(500);
    let make_writer = LogMakeWriter {
        sender: log_tx.clone(),
        suppress_stderr,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level_from_env())
        .with_ansi(!suppress_stderr && console::colors_enabled_stderr())
        .with_writer(make_writer)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok(); // Already set in tests
    log_tx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_forwards_lines_to_subscribers() {
        let (tx, mut rx) = broadcast::channel(4);
        let make_writer = LogMakeWriter {
            sender: tx,
            suppress_stderr: true,
        };
        let mut writer = make_writer.make_writer();
        writer.write_all(b"run started\n").unwrap();
        writer.flush().unwrap();
        assert_eq!(rx.try_recv().unwrap(), "run started\n");
    }

    #[test]
    fn writer_without_subscribers_still_succeeds() {
        let (tx, _) = broadcast::channel(4);
        let mut writer = LogWriter {
            sender: tx,
            suppress_stderr: true,
        };
        assert_eq!(writer.write(b"dropped").unwrap(), 7);
    }
}
