//! Logger facade used by the commands.
use std::path::PathBuf;
use std::sync::Mutex;

use super::output::{ITEM, STAGE};
use super::types::{Counts, ItemEntry, ItemStatus};

/// Logger handed to every command.
///
/// Messages are emitted as [`tracing`] events and rendered by the subscriber
/// from [`init_subscriber`](super::init_subscriber).  Item results are also
/// kept here so the run can end with a summary.
#[derive(Debug)]
pub struct Logger {
    items: Mutex<Vec<ItemEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a logger; `log_file` is only shown in the summary.
    #[must_use]
    pub const fn new(log_file: Option<PathBuf>) -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            log_file,
        }
    }

    /// Return the log file path, if one was opened.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a copy of the recorded items.
    #[must_use]
    pub fn entries(&self) -> Vec<ItemEntry> {
        self.items.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Totals over the recorded items.
    #[must_use]
    pub fn counts(&self) -> Counts {
        self.items
            .lock()
            .map_or_else(|_| Counts::default(), |g| Counts::tally(&g))
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header.
    pub fn stage(&self, msg: &str) {
        tracing::info!(kind = STAGE, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (console only when verbose).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Print the result line for `name` and keep it for the summary.
    ///
    /// Failed items are emitted at warn level so they reach stderr.
    pub fn record_item(&self, name: &str, status: ItemStatus, detail: Option<&str>) {
        let line = detail.map_or_else(|| name.to_string(), |d| format!("{name}: {d}"));
        if status == ItemStatus::Failed {
            tracing::warn!(kind = ITEM, status = status.label(), "{line}");
        } else {
            tracing::info!(kind = ITEM, status = status.label(), "{line}");
        }
        if let Ok(mut guard) = self.items.lock() {
            guard.push(ItemEntry {
                name: name.to_string(),
                status,
                message: detail.map(String::from),
            });
        }
    }

    /// Print the totals of the recorded items, if there are any.
    pub fn print_summary(&self) {
        let counts = self.counts();
        if counts.total() == 0 {
            return;
        }

        self.stage("Summary");
        self.info(&format!(
            "{} item(s): {} ok, {} skipped, {} failed",
            counts.total(),
            counts.ok,
            counts.skipped,
            counts.failed
        ));

        if counts.failed > 0 {
            match &self.log_file {
                Some(path) => self.warn(&format!(
                    "{} item(s) failed, see {}",
                    counts.failed,
                    path.display()
                )),
                None => self.warn(&format!("{} item(s) failed", counts.failed)),
            }
        }
    }
}
