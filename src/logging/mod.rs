//! Console and log-file output.

mod logger;
mod output;
mod types;

pub use logger::Logger;
pub use output::{init_subscriber, log_file_in, log_file_path};
pub use types::{Counts, ItemEntry, ItemStatus};

/// A [`Logger`] whose events go to a temporary log file for the current
/// thread only.
#[cfg(test)]
pub(crate) struct Capture {
    pub(crate) logger: Logger,
    path: std::path::PathBuf,
    _dir: tempfile::TempDir,
    _guard: tracing::dispatcher::DefaultGuard,
}

#[cfg(test)]
#[allow(clippy::expect_used)]
impl Capture {
    /// Everything written to the log file so far.
    pub(crate) fn contents(&self) -> String {
        std::fs::read_to_string(&self.path).expect("read log file")
    }
}

/// Install a thread-local subscriber writing to a fresh log file.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn capture() -> Capture {
    use tracing_subscriber::layer::SubscriberExt as _;

    let dir = tempfile::tempdir().expect("temp dir");
    let path = log_file_in(dir.path(), "test");
    let file = output::open_log_file(&path, "test").expect("open log file");
    let subscriber = tracing_subscriber::registry().with(output::file_layer(file));
    let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber));
    Capture {
        logger: Logger::new(Some(path.clone())),
        path,
        _dir: dir,
        _guard: guard,
    }
}
