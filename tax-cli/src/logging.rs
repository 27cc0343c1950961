use std::io::{self, IsTerminal};
use std::sync::OnceLock;

use thiserror::Error;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter, Registry,
    filter::ParseError,
    fmt::{
        FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
};

/// Filter used when neither `RUST_LOG` nor `--log-level` is given.
///
/// Reports go to stdout; only warnings reach stderr unless asked for.
pub const DEFAULT_FILTER: &str = "warn";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter '{directive}': {source}")]
    InvalidFilter {
        directive: String,
        #[source]
        source: ParseError,
    },

    #[error("logging is not initialized")]
    NotInitialized,

    #[error("log filter reload failed: {0}")]
    Reload(#[from] reload::Error),
}

type FilterHandle = reload::Handle<EnvFilter, Registry>;

static FILTER_HANDLE: OnceLock<FilterHandle> = OnceLock::new();

/// One line per event: level, `file:line`, then the event fields.
///
/// Only warnings and errors are coloured; the location is dimmed.
struct CompactFmt;

impl CompactFmt {
    fn level_colour(level: Level) -> Option<&'static str> {
        match level {
            Level::ERROR => Some("\x1b[1;31m"),
            Level::WARN => Some("\x1b[1;33m"),
            _ => None,
        }
    }
}

impl<S, N> FormatEvent<S, N> for CompactFmt
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
        let meta = event.metadata();
        let level = *meta.level();

        match Self::level_colour(level).filter(|_| writer.has_ansi_escapes()) {
            Some(colour) => write!(writer, "{colour}{level:>5}\x1b[0m ")?,
            None => write!(writer, "{level:>5} ")?,
        }

        if let (Some(file), Some(line)) = (meta.file(), meta.line()) {
            if writer.has_ansi_escapes() {
                write!(writer, "\x1b[2m{file}:{line}\x1b[0m ")?;
            } else {
                write!(writer, "{file}:{line} ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn parse_filter(directive: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directive).map_err(|source| LoggingError::InvalidFilter {
        directive: directive.to_string(),
        source,
    })
}

/// `--log-level` wins over `RUST_LOG`, which wins over [`DEFAULT_FILTER`].
fn initial_filter(directive: Option<&str>) -> Result<EnvFilter, LoggingError> {
    match directive {
        Some(directive) => parse_filter(directive),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

/// Replaces the active log filter, e.g. `debug` or `tax_core=trace,warn`.
pub fn set_log_level(directive: &str) -> Result<(), LoggingError> {
    let filter = parse_filter(directive)?;
    let handle = FILTER_HANDLE.get().ok_or(LoggingError::NotInitialized)?;
    handle.reload(filter)?;
    Ok(())
}

/// Installs the stderr subscriber. Later calls leave the first one in place.
///
/// Colour is used only when stderr is a terminal.
pub fn init_logging(directive: Option<&str>) -> Result<(), LoggingError> {
    let (filter, handle) = reload::Layer::new(initial_filter(directive)?);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(CompactFmt)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    if tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init()
        .is_ok()
    {
        let _ = FILTER_HANDLE.set(handle);
    }
    Ok(())
}
