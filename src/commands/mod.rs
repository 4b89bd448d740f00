//! Top-level subcommand orchestration.
pub mod init;
pub mod manage;
pub mod status;
pub mod unmanage;
pub mod update;
pub mod version;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use walkdir::WalkDir;

use crate::cli::GlobalOpts;
use crate::config::{self, settings, settings::Settings};
use crate::error::LinkError;
use crate::links::{Dirs, LinkManager, paths};
use crate::logging::{ItemStatus, Logger};

/// Shared state produced by the common command setup sequence.
///
/// Encapsulates home resolution, discovery of the dotfiles directory, and
/// settings loading so that each command does not have to repeat the
/// boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Link manager over the resolved home and dotfiles directories.
    pub manager: LinkManager,
    /// Settings read from the dotfiles directory.
    pub settings: Settings,
}

impl CommandSetup {
    /// Resolve the home directory, follow the discovery pointer, and load
    /// the settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined, the
    /// discovery pointer is missing or invalid, or the settings file fails
    /// to parse.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        let home = resolve_home(global)?;
        log.debug(&format!("home: {}", home.display()));

        let settings_path = config::settings_path(&home)?;
        let storage = settings_path
            .parent()
            .map_or_else(|| PathBuf::from("/"), Path::to_path_buf);
        log.debug(&format!("dotfiles directory: {}", storage.display()));

        let settings = settings::load(&settings_path)?;
        log.debug(&format!(
            "{} update exclusion(s)",
            settings.update.exclude.len()
        ));

        Ok(Self {
            manager: LinkManager::new(Dirs::new(home, storage)),
            settings,
        })
    }

    /// Top-level entries of the dotfiles directory that are neither the
    /// settings file nor excluded by the settings, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the dotfiles directory cannot be read.
    pub fn storage_entries(&self) -> Result<Vec<PathBuf>> {
        let storage = &self.manager.dirs().storage;
        let mut entries = Vec::new();
        for entry in WalkDir::new(storage)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(LinkError::from).with_context(|| {
                format!("Failed to read dotfiles directory {}", storage.display())
            })?;
            if !self
                .settings
                .is_excluded(&entry.file_name().to_string_lossy())
            {
                entries.push(entry.into_path());
            }
        }
        Ok(entries)
    }
}

/// Return the home directory from `--home` / `$HOME`, made absolute.
///
/// # Errors
///
/// Returns an error if neither is set (or set to an empty value).
pub fn resolve_home(global: &GlobalOpts) -> Result<PathBuf> {
    let home = global
        .home
        .as_deref()
        .filter(|h| !h.as_os_str().is_empty())
        .context("cannot determine the home directory: set HOME or pass --home")?;
    absolute(home)
}

/// Make a path given on the command line absolute against the current
/// directory, normalising it lexically.
///
/// # Errors
///
/// Returns an error if `path` is relative and the current directory cannot
/// be determined.
pub fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(paths::normalize(path));
    }
    let cwd = std::env::current_dir().context("cannot determine the current directory")?;
    Ok(paths::absolutize(path, &cwd))
}

/// Apply `op` to every path, recording each result as an item, then print
/// the summary.
///
/// Per-path failures never abort the batch; `op` returns the item detail on
/// success.
fn run_each<F>(log: &Logger, paths: &[PathBuf], mut op: F) -> Result<()>
where
    F: FnMut(&Path) -> crate::error::Result<String>,
{
    for raw in paths {
        let name = raw.display().to_string();
        let path = absolute(raw)?;
        match op(&path) {
            Ok(detail) => log.record_item(&name, ItemStatus::Ok, Some(&detail)),
            Err(e) => {
                if !e.is_expected() {
                    log.debug(&format!("{name}: {e:?}"));
                }
                log.record_item(&name, ItemStatus::Failed, Some(&e.to_string()));
            }
        }
    }
    log.print_summary();
    Ok(())
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
pub(crate) mod test_support {
    use std::path::{Path, PathBuf};

    use crate::cli::GlobalOpts;
    use crate::config;

    /// Temporary initialized home with the dotfiles directory at
    /// `<home>/dotdir`.
    pub(crate) struct Home {
        _tmp: tempfile::TempDir,
        pub(crate) home: PathBuf,
        pub(crate) storage: PathBuf,
    }

    impl Home {
        pub(crate) fn new() -> Self {
            let tmp = tempfile::tempdir().unwrap();
            let home = dunce::canonicalize(tmp.path()).unwrap();
            let storage = home.join("dotdir");
            config::initialize(&home, &storage).unwrap();
            Self {
                _tmp: tmp,
                home,
                storage,
            }
        }

        pub(crate) fn global(&self) -> GlobalOpts {
            GlobalOpts {
                home: Some(self.home.clone()),
            }
        }

        pub(crate) fn file(&self, rel: &str, content: &str) -> PathBuf {
            let path = self.home.join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, content).unwrap();
            path
        }

        pub(crate) fn path(&self, rel: &str) -> PathBuf {
            self.home.join(rel)
        }

        pub(crate) fn is_link(path: &Path) -> bool {
            path.symlink_metadata()
                .is_ok_and(|m| m.file_type().is_symlink())
        }
    }
}
