//! Rendering of log events for the console and the per-command log file.
//!
//! Events carry an optional `kind` field: `"stage"` for section headers and
//! `"item"` (with a `status` label) for per-path results.  Everything else is
//! a plain message rendered by level.  The same [`LineFormat`] drives both
//! outputs; colour follows the writer's ANSI setting, so the log file never
//! contains escape codes.
use std::fs::{self, File};
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{Event, Level, Subscriber, field};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::{self, FmtContext, FormatEvent, FormatFields, format};
use tracing_subscriber::registry::LookupSpan;

use super::types::ItemStatus;

/// `kind` value of stage header events.
pub(super) const STAGE: &str = "stage";
/// `kind` value of per-item result events.
pub(super) const ITEM: &str = "item";

/// Fields of interest pulled out of an event.
#[derive(Default)]
struct EventFields {
    message: String,
    kind: Option<String>,
    status: Option<String>,
}

impl field::Visit for EventFields {
    fn record_debug(&mut self, field: &field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &field::Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "kind" => self.kind = Some(value.to_string()),
            "status" => self.status = Some(value.to_string()),
            _ => {}
        }
    }
}

/// One line per event; `timestamps` prefixes the local time (log file only).
#[derive(Debug, Clone, Copy)]
struct LineFormat {
    timestamps: bool,
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let mut fields = EventFields::default();
        event.record(&mut fields);
        let ansi = writer.has_ansi_escapes();
        let paint = |code: &str, text: &str| {
            if ansi {
                format!("\x1b[{code}m{text}\x1b[0m")
            } else {
                text.to_string()
            }
        };

        if self.timestamps {
            write!(writer, "{} ", chrono::Local::now().format("%H:%M:%S"))?;
        }

        let msg = &fields.message;
        match fields.kind.as_deref() {
            Some(STAGE) => writeln!(writer, "{} {}", paint("1;34", "==>"), paint("1", msg)),
            Some(ITEM) => {
                let status = fields
                    .status
                    .as_deref()
                    .and_then(ItemStatus::from_label)
                    .unwrap_or(ItemStatus::Ok);
                writeln!(
                    writer,
                    "  {} {msg}",
                    paint(status.color(), status.icon())
                )
            }
            _ => match *event.metadata().level() {
                Level::ERROR => writeln!(writer, "{} {msg}", paint("31", "error:")),
                Level::WARN => writeln!(writer, "{} {msg}", paint("33", "warning:")),
                Level::INFO => writeln!(writer, "  {msg}"),
                _ => writeln!(writer, "  {}", paint("2", msg)),
            },
        }
    }
}

/// Return the log file for `command` under `cache_root`.
#[must_use]
pub fn log_file_in(cache_root: &Path, command: &str) -> PathBuf {
    cache_root.join("dotfiler").join(format!("{command}.log"))
}

/// Return the log file for `command`: `$XDG_CACHE_HOME/dotfiler/<command>.log`,
/// or `~/.cache/dotfiler/<command>.log` when `XDG_CACHE_HOME` is unset.
#[must_use]
pub fn log_file_path(command: &str) -> Option<PathBuf> {
    let cache_root = std::env::var_os("XDG_CACHE_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".cache")))?;
    Some(log_file_in(&cache_root, command))
}

/// Create (truncating) the log file at `path` and write the run header.
pub(super) fn open_log_file(path: &Path, command: &str) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    writeln!(
        file,
        "# dotfiler {} {command} {}",
        crate::commands::version::version(),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S %z")
    )?;
    Ok(file)
}

/// Layer writing every event at `DEBUG` and above to `file`, without colour.
pub(super) fn file_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_ansi(false)
        .event_format(LineFormat { timestamps: true })
        .with_writer(Mutex::new(file))
        .with_filter(LevelFilter::DEBUG)
}

/// Install the global subscriber for a run of `command`.
///
/// The console shows warnings and errors on stderr and everything else on
/// stdout, with debug messages only when `verbose`.  The log file receives
/// every event regardless.  Returns the log file path, or `None` when no
/// log file could be opened (the run continues with console output only).
pub fn init_subscriber(verbose: bool, command: &str) -> Option<PathBuf> {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let console_writer = io::stderr
        .with_max_level(Level::WARN)
        .and(io::stdout.with_min_level(Level::INFO));
    let console = fmt::layer()
        .event_format(LineFormat { timestamps: false })
        .with_writer(console_writer)
        .with_filter(console_level);

    let (path, file) = log_file_path(command)
        .and_then(|path| open_log_file(&path, command).ok().map(|file| (path, file)))
        .map(|(path, file)| (path, file_layer(file)))
        .unzip();

    tracing_subscriber::registry().with(console).with(file).init();
    path
}
