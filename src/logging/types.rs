//! Per-item results recorded for the run summary.

/// Result of processing a single item (a path in a batch command).
#[derive(Debug, Clone)]
pub struct ItemEntry {
    /// The item, usually a path as the user typed it.
    pub name: String,
    /// Final status of the item.
    pub status: ItemStatus,
    /// Optional detail (where it was moved, why it was skipped, the error).
    pub message: Option<String>,
}

/// Status of a processed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    /// The operation succeeded.
    Ok,
    /// The item was deliberately left alone (e.g. a dotfile is in the way).
    Skipped,
    /// The operation failed for this item.
    Failed,
}

impl ItemStatus {
    /// Stable label carried by item events and written to the log file.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Skipped => "skip",
            Self::Failed => "fail",
        }
    }

    /// Parse a label produced by [`ItemStatus::label`].
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "ok" => Some(Self::Ok),
            "skip" => Some(Self::Skipped),
            "fail" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Console marker.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Ok => "✓",
            Self::Skipped => "○",
            Self::Failed => "✗",
        }
    }

    /// SGR colour code for the console marker.
    pub(super) const fn color(self) -> &'static str {
        match self {
            Self::Ok => "32",
            Self::Skipped => "33",
            Self::Failed => "31",
        }
    }
}

/// Totals over a run's items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    /// Items that succeeded.
    pub ok: usize,
    /// Items left alone.
    pub skipped: usize,
    /// Items that failed.
    pub failed: usize,
}

impl Counts {
    /// Count `items` by status.
    #[must_use]
    pub fn tally(items: &[ItemEntry]) -> Self {
        items.iter().fold(Self::default(), |mut c, item| {
            match item.status {
                ItemStatus::Ok => c.ok += 1,
                ItemStatus::Skipped => c.skipped += 1,
                ItemStatus::Failed => c.failed += 1,
            }
            c
        })
    }

    /// Number of items counted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.ok + self.skipped + self.failed
    }
}
