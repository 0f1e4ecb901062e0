use anyhow::{Context, Result};
use chrono::Local;
use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{
        FmtContext, FormattedFields, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
};

// --- Formatter ---

/// `<time> <LEVEL> <target> <span{fields}>: <message>`
///
/// The terminal gets a short wall-clock time; the log file gets the full
/// local timestamp with offset.
struct EventLine {
    full_timestamp: bool,
}

impl EventLine {
    fn level_color(level: &Level) -> &'static str {
        match *level {
            Level::ERROR => "\x1b[1;31m",
            Level::WARN => "\x1b[1;33m",
            Level::INFO => "\x1b[1;32m",
            Level::DEBUG => "\x1b[1;34m",
            Level::TRACE => "\x1b[1;35m",
        }
    }
}

impl<S, N> FormatEvent<S, N> for EventLine
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
        let ansi = writer.has_ansi_escapes();
        let now = Local::now();
        let stamp = if self.full_timestamp {
            now.format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        } else {
            now.format("%H:%M:%S%.3f")
        };

        if ansi {
            write!(
                writer,
                "\x1b[2m{stamp}\x1b[0m {}{:>5}\x1b[0m \x1b[36m{}\x1b[0m ",
                Self::level_color(meta.level()),
                meta.level(),
                meta.target()
            )?;
        } else {
            write!(writer, "{stamp} {:>5} {} ", meta.level(), meta.target())?;
        }

        // e.g. `submit{town=Lekki title=Bungalow}: `
        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(writer, "{}", span.name())?;
                let extensions = span.extensions();
                if let Some(fields) = extensions.get::<FormattedFields<N>>() {
                    if !fields.is_empty() {
                        write!(writer, "{{{fields}}}")?;
                    }
                }
                write!(writer, ": ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

// --- Log file ---

type SharedFile = Arc<Mutex<Option<File>>>;

/// Writer for the file layer. Output is dropped until a file is opened.
#[derive(Clone)]
struct LogFile(SharedFile);

struct LogFileWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for LogFileWriter<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        match self.0.as_mut() {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.as_mut().map_or(Ok(()), File::flush)
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogFileWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LogFileWriter(self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

// --- Runtime controls ---

type Reload = Box<dyn Fn(EnvFilter) -> Result<(), reload::Error> + Send + Sync>;

/// Handles kept after init so the CLI can adjust logging.
struct LogControls {
    level: Reload,
    stderr_gate: Reload,
    file: SharedFile,
}

static CONTROLS: OnceLock<LogControls> = OnceLock::new();

fn controls() -> Result<&'static LogControls> {
    CONTROLS.get().context("logging not yet initialized")
}

fn reloader<S>(handle: reload::Handle<EnvFilter, S>) -> Reload
where
    S: Subscriber + Send + Sync + 'static,
{
    Box::new(move |filter: EnvFilter| handle.reload(filter))
}

// --- Public API ---

/// Changes the active log filter at runtime.
/// Accepts a bare level ("warn", "debug", ...) or any EnvFilter directive
/// such as `price_core=trace`.
pub fn set_log_level(level: &str) -> Result<()> {
    let filter =
        EnvFilter::try_new(level).with_context(|| format!("invalid log level '{level}'"))?;
    (controls()?.level)(filter).context("filter reload failed")
}

/// Shows or hides log output on stderr without affecting file logging.
pub fn set_stderr_enabled(enabled: bool) -> Result<()> {
    // The global level filter still applies on top of "trace".
    let gate = EnvFilter::new(if enabled { "trace" } else { "off" });
    (controls()?.stderr_gate)(gate).context("stderr reload failed")
}

/// Starts appending log output to `path`, replacing any open log file.
/// The directory must already exist.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))?;

    *controls()?
        .file
        .lock()
        .unwrap_or_else(PoisonError::into_inner) = Some(file);
    Ok(())
}

/// Initializes logging. Call once at startup; later calls are no-ops.
///
/// Stdout belongs to the form, so the terminal layer writes to stderr
/// (colored only on a terminal). The file layer stays silent until
/// [`enable_file_logging`]. The level is INFO unless `RUST_LOG` says
/// otherwise.
pub fn init_default_logging() {
    let file: SharedFile = Arc::new(Mutex::new(None));

    let initial = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (level_filter, level_handle) = reload::Layer::new(initial);
    let (stderr_gate, stderr_handle) = reload::Layer::new(EnvFilter::new("trace"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(EventLine {
            full_timestamp: false,
        })
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_filter(stderr_gate);

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(EventLine {
            full_timestamp: true,
        })
        .with_ansi(false)
        .with_writer(LogFile(file.clone()));

    let installed = tracing_subscriber::registry()
        .with(level_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    if installed.is_ok() {
        let _ = CONTROLS.set(LogControls {
            level: reloader(level_handle),
            stderr_gate: reloader(stderr_handle),
            file,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Everything lives in one test: the subscriber is process-global.
    #[test]
    fn runtime_controls_after_init() {
        init_default_logging();

        set_log_level("debug").unwrap();
        assert!(set_log_level("price_ui=loud").is_err());
        set_stderr_enabled(false).unwrap();
        set_stderr_enabled(true).unwrap();

        let path = std::env::temp_dir().join(format!("price-ui-log-{}.log", std::process::id()));
        enable_file_logging(&path).unwrap();
        let town = "Lekki";
        tracing::info_span!("submit", town = %town).in_scope(|| {
            tracing::info!("written to file");
        });
        let contents = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let line = contents
            .lines()
            .find(|line| line.contains("written to file"))
            .unwrap();
        assert!(line.contains(" INFO price_ui::logging::tests submit{town=Lekki}: "));
        // Full timestamp in the file: date, time and offset.
        assert_eq!(line.chars().nth(4), Some('-'));
        assert_eq!(line.chars().nth(10), Some('T'));
    }
}
