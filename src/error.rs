//! Domain-specific error types for the link manager.
//!
//! Every expected outcome of a predicate or operation that is not a success
//! (a path that is already managed, a missing discovery pointer, …) is a
//! variant of [`LinkError`] carrying the offending path.  Genuine I/O faults
//! are wrapped in [`LinkError::Io`] / [`LinkError::Walk`].  Command handlers at
//! the CLI boundary convert these to [`anyhow::Error`] via the `?` operator.
//!
//! # Taxonomy
//!
//! ```text
//! LinkError
//! ├── NotManageable / AlreadyManaged / PartiallyManaged   # manage
//! ├── NotManaged                                          # unmanage
//! ├── DirExists / ConfigExists                            # init
//! ├── ConfigMissing / ConfigInvalid                       # discovery
//! ├── TargetIsSymlink / DotfileExists                     # update
//! └── Io / Walk                                           # I/O faults
//! ```

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised by the link manager, the discovery pointer, and bootstrap.
#[derive(Error, Debug)]
pub enum LinkError {
    /// The path cannot be placed under management.
    #[error("{} cannot be managed: {reason}", path.display())]
    NotManageable {
        /// Path the operation was requested for.
        path: PathBuf,
        /// Human-readable explanation.
        reason: String,
    },

    /// The path, or one of its ancestors, is already under management.
    #[error("{} is already managed", path.display())]
    AlreadyManaged {
        /// Path the operation was requested for.
        path: PathBuf,
    },

    /// Only some descendants of the directory are managed.
    #[error("{} is partially managed", path.display())]
    PartiallyManaged {
        /// Directory the operation was requested for.
        path: PathBuf,
    },

    /// Restore was requested for a path that is neither managed nor partially managed.
    #[error("{} is not managed: {reason}", path.display())]
    NotManaged {
        /// Path the operation was requested for.
        path: PathBuf,
        /// Human-readable explanation.
        reason: String,
    },

    /// The storage directory passed to `init` already exists.
    #[error("directory {} already exists", path.display())]
    DirExists {
        /// The storage directory.
        path: PathBuf,
    },

    /// A discovery pointer is already present in the home directory.
    #[error("discovery pointer {} already exists", path.display())]
    ConfigExists {
        /// The discovery pointer path.
        path: PathBuf,
    },

    /// The discovery pointer is absent or dangling.
    #[error("no dotfiles directory configured: {} is missing (run `dotfiler init <DIR>`)", path.display())]
    ConfigMissing {
        /// The discovery pointer path.
        path: PathBuf,
    },

    /// The discovery pointer exists but does not point to a settings file.
    #[error("discovery pointer {} is invalid: {reason}", path.display())]
    ConfigInvalid {
        /// The discovery pointer path.
        path: PathBuf,
        /// Human-readable explanation.
        reason: String,
    },

    /// A storage entry selected for linking is itself a symlink.
    #[error("{} is a symlink", path.display())]
    TargetIsSymlink {
        /// The storage entry.
        path: PathBuf,
    },

    /// A regular dotfile is in the way of a link created by `update`.
    #[error("{} exists", path.display())]
    DotfileExists {
        /// The dotfile path in the home directory.
        path: PathBuf,
    },

    /// A filesystem call failed.
    #[error("{action} {}: {source}", path.display())]
    Io {
        /// What was being attempted (e.g. `"move"`).
        action: &'static str,
        /// Path the call was made on.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Directory traversal failed.
    #[error("walking directory tree: {0}")]
    Walk(#[from] walkdir::Error),
}

impl LinkError {
    /// Build a closure mapping an [`io::Error`] to [`LinkError::Io`] for `path`.
    ///
    /// Intended for `map_err`: `fs::rename(a, b).map_err(LinkError::io("move", a))?`.
    pub fn io<'a>(action: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> Self + 'a {
        move |source| Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Return `true` for outcomes that reflect the state of the path rather
    /// than a fault in the filesystem.
    #[must_use]
    pub const fn is_expected(&self) -> bool {
        !matches!(self, Self::Io { .. } | Self::Walk(_))
    }
}

/// Convenience alias for results carrying a [`LinkError`].
pub type Result<T, E = LinkError> = std::result::Result<T, E>;
