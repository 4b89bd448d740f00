//! The link manager: management predicates and the operations that move a
//! dotfile between the home directory and the dotfiles directory.
//!
//! A dotfile is *managed* when it, or one of its ancestors below the home
//! directory, is a symbolic link whose target exists inside the dotfiles
//! directory.  Managing a directory therefore implicitly manages everything
//! beneath it.  A directory that is not managed itself but contains managed
//! links is *partially managed*; both situations make further management of
//! the surrounding tree ambiguous and are rejected.
//!
//! The storage path of a dotfile is its home-relative path with the dot
//! stripped from the first component:
//!
//! ```text
//! ~/.bashrc                  -> <storage>/bashrc
//! ~/.config/nvim/init.lua    -> <storage>/config/nvim/init.lua
//! ```
pub mod fs;
pub mod paths;

use std::fmt;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{LinkError, Result};

/// The two directories every operation works between.
///
/// Built once by the entry point and handed to [`LinkManager::new`]; nothing
/// in this module reads the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dirs {
    /// The user's home directory.
    pub home: PathBuf,
    /// The dotfiles directory holding the content of managed entries.
    pub storage: PathBuf,
}

impl Dirs {
    /// Create a new context from absolute paths, normalising them lexically.
    #[must_use]
    pub fn new(home: impl Into<PathBuf>, storage: impl Into<PathBuf>) -> Self {
        Self {
            home: paths::normalize(&home.into()),
            storage: paths::normalize(&storage.into()),
        }
    }

    /// The discovery pointer in the home directory.
    #[must_use]
    pub fn pointer(&self) -> PathBuf {
        crate::config::pointer_path(&self.home)
    }

    /// Return `true` if `path` is the dotfiles directory or lies inside it.
    fn in_storage(&self, path: &Path) -> bool {
        path.starts_with(&self.storage)
    }
}

/// A symbolic link that puts a path under management.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedLink {
    /// The link in the home directory.
    pub link: PathBuf,
    /// The resolved target inside the dotfiles directory.
    pub target: PathBuf,
}

/// Management state of a single path, as reported by [`LinkManager::state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagementState {
    /// Nothing exists at the path.
    Missing,
    /// A regular file or directory with no managed descendants.
    Unmanaged,
    /// The path, or an ancestor, links into the dotfiles directory.
    Managed,
    /// A directory that is not managed but contains managed links.
    PartiallyManaged,
    /// A link into the dotfiles directory whose target is gone.
    Broken,
    /// A link (on the path or an ancestor) pointing outside the dotfiles directory.
    Foreign,
}

impl fmt::Display for ManagementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Missing => "missing",
            Self::Unmanaged => "unmanaged",
            Self::Managed => "managed",
            Self::PartiallyManaged => "partially managed",
            Self::Broken => "broken link",
            Self::Foreign => "foreign link",
        };
        f.write_str(s)
    }
}

/// Result of [`LinkManager::link_into_home`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// A new link was created at the contained dotfile path.
    Linked(PathBuf),
    /// The dotfile path already linked to the storage entry.
    AlreadyLinked(PathBuf),
}

/// Owns every state-changing operation on managed dotfiles.
#[derive(Debug, Clone)]
pub struct LinkManager {
    dirs: Dirs,
}

impl LinkManager {
    /// Create a link manager over `dirs`.
    #[must_use]
    pub const fn new(dirs: Dirs) -> Self {
        Self { dirs }
    }

    /// The directories this manager operates on.
    #[must_use]
    pub const fn dirs(&self) -> &Dirs {
        &self.dirs
    }

    /// Compute where the content of the dotfile at `path` lives once managed.
    ///
    /// Returns `None` if `path` is not below the home directory or its first
    /// home-relative component has no leading dot.
    #[must_use]
    pub fn target_for(&self, path: &Path) -> Option<PathBuf> {
        let relative = paths::normalize(path)
            .strip_prefix(&self.dirs.home)
            .ok()
            .and_then(paths::relative_target)?;
        Some(self.dirs.storage.join(relative))
    }

    /// Return `true` if `path`, or an ancestor up to the home directory, is a
    /// link to an existing entry inside the dotfiles directory.
    ///
    /// # Errors
    ///
    /// Returns an error if link metadata cannot be read.
    pub fn is_managed(&self, path: &Path) -> Result<bool> {
        Ok(self.managing_link(&paths::normalize(path))?.is_some())
    }

    /// Return `true` if `path` is not managed but at least one descendant is.
    ///
    /// The tree is walked lazily and the walk stops at the first managed
    /// descendant.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be traversed.
    pub fn is_partially_managed(&self, path: &Path) -> Result<bool> {
        let path = paths::normalize(path);
        if self.is_managed(&path)? {
            return Ok(false);
        }
        Ok(self.managed_descendants(&path).next().transpose()?.is_some())
    }

    /// Classify `path` for reporting.
    ///
    /// # Errors
    ///
    /// Returns an error if link metadata cannot be read or the tree cannot be
    /// traversed.
    pub fn state(&self, path: &Path) -> Result<ManagementState> {
        let path = paths::normalize(path);
        if !fs::entry_exists(&path) {
            return Ok(ManagementState::Missing);
        }
        if let Some((_, target)) = self.first_link(&path)? {
            let state = if !self.points_into_storage(&target) {
                ManagementState::Foreign
            } else if target.exists() {
                ManagementState::Managed
            } else {
                ManagementState::Broken
            };
            return Ok(state);
        }
        if self.is_partially_managed(&path)? {
            Ok(ManagementState::PartiallyManaged)
        } else {
            Ok(ManagementState::Unmanaged)
        }
    }

    /// Put the dotfile at `path` under management and return the storage
    /// path its content was moved to.
    ///
    /// Preconditions are checked in order and the first failure is returned
    /// before anything on disk is touched.
    ///
    /// # Errors
    ///
    /// - [`LinkError::NotManageable`] if `path` does not exist, is outside the
    ///   home directory (or inside the dotfiles directory), has no leading
    ///   dot, is itself a symlink, or its storage path is already taken.
    /// - [`LinkError::AlreadyManaged`] if `path` or an ancestor is managed.
    /// - [`LinkError::PartiallyManaged`] if a descendant is managed.
    /// - [`LinkError::Io`] if the move or the link creation fails.
    pub fn manage(&self, path: &Path) -> Result<PathBuf> {
        let path = paths::normalize(path);
        let not_manageable = |reason: String| LinkError::NotManageable {
            path: path.clone(),
            reason,
        };

        if !fs::entry_exists(&path) {
            return Err(not_manageable("it does not exist".to_string()));
        }
        let relative = path.strip_prefix(&self.dirs.home).map_err(|_| {
            not_manageable(format!(
                "it is not inside the home directory {}",
                self.dirs.home.display()
            ))
        })?;
        if relative.as_os_str().is_empty() {
            return Err(not_manageable("it is the home directory".to_string()));
        }
        if self.dirs.in_storage(&path) {
            return Err(not_manageable(format!(
                "it is inside the dotfiles directory {}",
                self.dirs.storage.display()
            )));
        }
        if self.dirs.storage.starts_with(&path) {
            return Err(not_manageable(format!(
                "it contains the dotfiles directory {}",
                self.dirs.storage.display()
            )));
        }
        let Some(target) = self.target_for(&path) else {
            return Err(not_manageable(format!(
                "{} does not start with a dot",
                relative.components().next().map_or_else(
                    || relative.display().to_string(),
                    |c| c.as_os_str().to_string_lossy().into_owned()
                )
            )));
        };
        if self.is_managed(&path)? {
            return Err(LinkError::AlreadyManaged { path: path.clone() });
        }
        if fs::is_symlink(&path)? {
            return Err(not_manageable("it is a symlink".to_string()));
        }
        if self.is_partially_managed(&path)? {
            return Err(LinkError::PartiallyManaged { path: path.clone() });
        }
        if fs::entry_exists(&target) {
            return Err(not_manageable(format!(
                "{} already exists",
                target.display()
            )));
        }

        fs::ensure_parent_dir(&target)?;
        fs::move_path(&path, &target)?;
        fs::create_symlink(&target, &path).inspect_err(|_| {
            tracing::error!(
                "{} was moved to {} but the link back could not be created",
                path.display(),
                target.display()
            );
        })?;
        tracing::debug!("{} -> {}", path.display(), target.display());
        Ok(target)
    }

    /// Take `path` out of management and return every restored path.
    ///
    /// A managed link is replaced by its content.  For a partially managed
    /// directory, every managed descendant link is restored and unmanaged
    /// descendants are left alone.  Storage directories left empty by a
    /// restore are pruned.
    ///
    /// # Errors
    ///
    /// - [`LinkError::NotManaged`] if `path` is neither managed nor partially
    ///   managed, is only managed through an ancestor link, is the discovery
    ///   pointer, or lies inside the dotfiles directory.
    /// - [`LinkError::Io`] / [`LinkError::Walk`] on filesystem failures.
    pub fn unmanage(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let path = paths::normalize(path);
        let not_managed = |reason: &str| LinkError::NotManaged {
            path: path.clone(),
            reason: reason.to_string(),
        };

        if path == self.dirs.pointer() {
            return Err(not_managed(
                "it is the discovery pointer of the dotfiles directory",
            ));
        }
        if self.dirs.in_storage(&path) {
            return Err(not_managed("it is inside the dotfiles directory"));
        }

        if let Some(managed) = self.managing_link(&path)? {
            if managed.link != path {
                return Err(not_managed(&format!(
                    "it is managed through {}, unmanage that instead",
                    managed.link.display()
                )));
            }
            self.restore(&managed)?;
            return Ok(vec![path.clone()]);
        }

        if self.is_partially_managed(&path)? {
            // Collect first: restoring turns links into real entries the
            // walk would otherwise descend into.
            let links = self
                .managed_descendants(&path)
                .collect::<Result<Vec<_>>>()?;
            for managed in &links {
                self.restore(managed)?;
            }
            return Ok(links.into_iter().map(|m| m.link).collect());
        }

        let reason = if !fs::entry_exists(&path) {
            "it does not exist"
        } else if fs::is_symlink(&path)? {
            "it is not a link to an existing entry in the dotfiles directory"
        } else {
            "it is not a link"
        };
        Err(not_managed(reason))
    }

    /// Link the top-level storage entry `target` into the home directory as
    /// `~/.<name>`.
    ///
    /// Existing links at the dotfile path are replaced; an existing regular
    /// file is only replaced when `overwrite` is set.
    ///
    /// # Errors
    ///
    /// - [`LinkError::NotManageable`] if `target` is not a direct child of
    ///   the dotfiles directory.
    /// - [`LinkError::TargetIsSymlink`] if `target` is a symlink.
    /// - [`LinkError::DotfileExists`] if a real entry is in the way.
    /// - [`LinkError::Io`] if the link cannot be created.
    pub fn link_into_home(&self, target: &Path, overwrite: bool) -> Result<LinkOutcome> {
        let target = paths::normalize(target);
        let name = match target.file_name() {
            Some(name) if target.parent() == Some(self.dirs.storage.as_path()) => name,
            _ => {
                return Err(LinkError::NotManageable {
                    reason: "it is not a top-level entry of the dotfiles directory".to_string(),
                    path: target,
                });
            }
        };
        let dot_path = self.dirs.home.join(paths::dotted(name));

        if fs::is_symlink(&target)? {
            return Err(LinkError::TargetIsSymlink { path: target });
        }
        if fs::is_symlink(&dot_path)? {
            let raw = std::fs::read_link(&dot_path).map_err(LinkError::io("read link", &dot_path))?;
            if paths::resolve_link_target(&dot_path, &raw) == target {
                return Ok(LinkOutcome::AlreadyLinked(dot_path));
            }
        } else if fs::entry_exists(&dot_path) && !(overwrite && dot_path.is_file()) {
            return Err(LinkError::DotfileExists { path: dot_path });
        }

        fs::remove_existing(&dot_path)?;
        fs::create_symlink(&target, &dot_path)?;
        Ok(LinkOutcome::Linked(dot_path))
    }

    /// Return the link managing `path`, if any.
    ///
    /// Only the first link found walking upward decides: a link pointing
    /// elsewhere, or a dangling one, means `path` is not managed.
    ///
    /// # Errors
    ///
    /// Returns an error if link metadata cannot be read.
    pub fn managing_link(&self, path: &Path) -> Result<Option<ManagedLink>> {
        let Some((link, target)) = self.first_link(path)? else {
            return Ok(None);
        };
        Ok((self.points_into_storage(&target) && target.exists())
            .then_some(ManagedLink { link, target }))
    }

    /// Lazily yield every managed link below `path`.
    ///
    /// Symlinks are never followed, so the walk does not descend into
    /// managed directories.  Once `path` itself is known to be unmanaged,
    /// only a link below it can be managed, so plain entries are skipped
    /// without further checks.  The dotfiles directory and the discovery
    /// pointer are pruned from the walk: links stored there belong to
    /// managed content, not to the home directory.
    fn managed_descendants<'a>(
        &'a self,
        path: &Path,
    ) -> impl Iterator<Item = Result<ManagedLink>> + 'a {
        let is_real_dir = std::fs::symlink_metadata(path).is_ok_and(|m| m.is_dir());
        let pointer = self.dirs.pointer();
        WalkDir::new(path)
            .min_depth(1)
            .follow_links(false)
            .follow_root_links(false)
            .into_iter()
            .filter_entry(move |entry| {
                !self.dirs.in_storage(entry.path()) && entry.path() != pointer
            })
            .take_while(move |_| is_real_dir)
            .filter_map(move |entry| match entry {
                Ok(entry) if entry.path_is_symlink() => {
                    self.managing_link(entry.path()).transpose()
                }
                Ok(_) => None,
                Err(e) => Some(Err(e.into())),
            })
    }

    /// Walk from `path` up to the home directory and return the first
    /// symlink found together with its resolved target.
    fn first_link(&self, path: &Path) -> Result<Option<(PathBuf, PathBuf)>> {
        for ancestor in path.ancestors() {
            if !ancestor.starts_with(&self.dirs.home) {
                break;
            }
            if fs::is_symlink(ancestor)? {
                let raw =
                    std::fs::read_link(ancestor).map_err(LinkError::io("read link", ancestor))?;
                let target = paths::resolve_link_target(ancestor, &raw);
                return Ok(Some((ancestor.to_path_buf(), target)));
            }
        }
        Ok(None)
    }

    /// Return `true` if `target` lies inside the dotfiles directory, either
    /// lexically or once both sides are canonicalised.
    fn points_into_storage(&self, target: &Path) -> bool {
        if target.starts_with(&self.dirs.storage) {
            return true;
        }
        match (
            dunce::canonicalize(target),
            dunce::canonicalize(&self.dirs.storage),
        ) {
            (Ok(target), Ok(storage)) => target.starts_with(storage),
            _ => false,
        }
    }

    fn restore(&self, managed: &ManagedLink) -> Result<()> {
        fs::remove_symlink(&managed.link)?;
        fs::move_path(&managed.target, &managed.link)?;
        if let Some(parent) = managed.target.parent() {
            fs::prune_empty_dirs(parent, &self.dirs.storage);
        }
        tracing::debug!(
            "{} restored from {}",
            managed.link.display(),
            managed.target.display()
        );
        Ok(())
    }
}
