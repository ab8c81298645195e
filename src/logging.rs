//! Security log: an append-only file of `<timestamp> - <LEVEL> - <message>`
//! lines fed by `tracing` events.
//!
//! The level filter defaults to `info` and can be overridden with
//! `RUST_LOG`.  The log is write-only; nothing in the crate reads it back.

use std::fmt;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

use crate::errors::{Result, SecurePassError};

/// Local time with millisecond precision, e.g. `2024-05-01 13:45:12,087`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Formats each event as a single `<timestamp> - <LEVEL> - <message>` line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let now = chrono::Local::now().format(TIMESTAMP_FORMAT);
        write!(writer, "{now} - {} - ", event.metadata().level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Install the global subscriber, appending to the file at `path`.
///
/// Fails if the file cannot be opened or a global subscriber is already
/// set; callers may treat either as "logging unavailable".
pub fn init(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .event_format(LineFormat)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| SecurePassError::Config(format!("cannot install logger: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(f: impl FnOnce()) -> String {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .event_format(LineFormat)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn lines_have_timestamp_level_message() {
        let out = capture(|| tracing::info!("Added entry for bank.com"));
        let line = out.lines().next().unwrap();

        let parts: Vec<&str> = line.splitn(3, " - ").collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), "2024-05-01 13:45:12,087".len());
        assert_eq!(&parts[0][10..11], " ");
        assert_eq!(&parts[0][19..20], ",");
        assert_eq!(parts[1], "INFO");
        assert_eq!(parts[2], "Added entry for bank.com");
    }

    #[test]
    fn each_event_is_one_line() {
        let out = capture(|| {
            tracing::warn!("first");
            tracing::error!("second");
        });
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" - WARN - first"));
        assert!(lines[1].ends_with(" - ERROR - second"));
    }

    #[test]
    fn init_creates_the_log_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("logs").join("security.log");
        // A global subscriber may already be set by another test; the file
        // is opened before that matters.
        let _ = init(&path);
        assert!(path.exists());
    }
}
