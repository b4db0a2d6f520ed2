//! Log sink
//!
//! One append-only file per hostname, `<dir>/<hostname>_ddns.log`, with
//! lines shaped like
//!
//! ```text
//! [16/Oct/2026:18:52:01 +0000] - INFO - message
//! ```
//!
//! The subscriber is installed for as long as the returned [`LogHandle`]
//! lives. Dropping the handle flushes buffered lines and closes the file.

use chrono::Local;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;

use crate::config::LogConfig;
use crate::error::{Error, Result};

/// Timestamp layout of every log line
pub const TIMESTAMP_FORMAT: &str = "[%d/%b/%Y:%H:%M:%S %z]";

/// Keeps the log sink open
///
/// Fields drop in declaration order: the dispatcher is uninstalled before
/// the worker flushes.
pub struct LogHandle {
    _dispatch: DefaultGuard,
    _worker: WorkerGuard,
    path: PathBuf,
}

impl LogHandle {
    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Open `<config.directory>/<file_name>` for appending and install the
/// subscriber on the current thread
pub fn init(config: &LogConfig, file_name: &str) -> Result<LogHandle> {
    let level = parse_level(&config.level)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(&config.directory)
        .map_err(|e| {
            Error::logging(format!(
                "cannot open {} in {}: {}",
                file_name,
                config.directory.display(),
                e
            ))
        })?;
    let (file_writer, worker) = tracing_appender::non_blocking(appender);

    let writer = if config.echo_stderr {
        BoxMakeWriter::new(file_writer.and(std::io::stderr))
    } else {
        BoxMakeWriter::new(file_writer)
    };

    let dispatch = tracing::subscriber::set_default(build_subscriber(level, writer));

    Ok(LogHandle {
        _dispatch: dispatch,
        _worker: worker,
        path: config.directory.join(file_name),
    })
}

/// Subscriber writing [`DdnsLogFormat`] lines at or above `level` to `writer`
pub fn build_subscriber<W>(level: Level, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(writer)
        .event_format(DdnsLogFormat)
        .finish()
}

/// Parse a level name (trace, debug, info, warn, error)
pub fn parse_level(level: &str) -> Result<Level> {
    Level::from_str(level.trim())
        .map_err(|_| Error::config(format!("Log level '{}' is not valid", level)))
}

/// `[timestamp] - LEVEL - message` line format
#[derive(Debug, Clone, Copy, Default)]
pub struct DdnsLogFormat;

impl<S, N> FormatEvent<S, N> for DdnsLogFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        write!(
            writer,
            "{} - {} - ",
            Local::now().format(TIMESTAMP_FORMAT),
            level_name(event.metadata().level())
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_name(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARNING",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}
