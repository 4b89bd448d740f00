//! Locating the dotfiles directory and bootstrapping a new one.
//!
//! The home directory holds a single discovery pointer, `~/.dotfiles`: a
//! symbolic link to the settings file `dotfiles` inside the dotfiles
//! directory.  The dotfiles directory is the parent of whatever the pointer
//! resolves to, so moving the directory only requires re-pointing one link.
pub mod settings;

use std::io;
use std::path::{Path, PathBuf};

use crate::error::{LinkError, Result};
use crate::links::{fs, paths};

/// Name of the discovery pointer in the home directory.
pub const POINTER_NAME: &str = ".dotfiles";

/// Name of the settings file inside the dotfiles directory.
pub const SETTINGS_NAME: &str = "dotfiles";

/// Path of the discovery pointer for `home`.
#[must_use]
pub fn pointer_path(home: &Path) -> PathBuf {
    home.join(POINTER_NAME)
}

/// Resolve the dotfiles directory from the discovery pointer in `home`.
///
/// # Errors
///
/// - [`LinkError::ConfigMissing`] if the pointer is absent or dangling.
/// - [`LinkError::ConfigInvalid`] if the pointer is not a symlink, or points
///   to something other than a regular file.
/// - [`LinkError::Io`] if metadata cannot be read.
pub fn discover(home: &Path) -> Result<PathBuf> {
    Ok(settings_path(home)?
        .parent()
        .map_or_else(|| PathBuf::from("/"), Path::to_path_buf))
}

/// Resolve the settings file the discovery pointer in `home` points to.
///
/// # Errors
///
/// Same as [`discover`].
pub fn settings_path(home: &Path) -> Result<PathBuf> {
    let pointer = pointer_path(home);
    match std::fs::symlink_metadata(&pointer) {
        Ok(meta) if meta.file_type().is_symlink() => {}
        Ok(_) => {
            return Err(LinkError::ConfigInvalid {
                path: pointer,
                reason: "it is not a symlink".to_string(),
            });
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(LinkError::ConfigMissing { path: pointer });
        }
        Err(e) => return Err(LinkError::io("read metadata", &pointer)(e)),
    }

    let raw = std::fs::read_link(&pointer).map_err(LinkError::io("read link", &pointer))?;
    let target = paths::resolve_link_target(&pointer, &raw);
    match std::fs::metadata(&target) {
        Ok(meta) if meta.is_file() => Ok(target),
        Ok(_) => Err(LinkError::ConfigInvalid {
            path: pointer,
            reason: format!("{} is not a regular file", target.display()),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(LinkError::ConfigMissing { path: target })
        }
        Err(e) => Err(LinkError::io("read metadata", &target)(e)),
    }
}

/// Create the dotfiles directory `storage` and point `home` at it.
///
/// Writes the default settings file into `storage` and links the discovery
/// pointer to it.  Nothing is created when either already exists.  `storage`
/// must be absolute.  Returns the settings file path.
///
/// # Errors
///
/// - [`LinkError::ConfigExists`] if a discovery pointer (even a dangling one)
///   is already present.
/// - [`LinkError::DirExists`] if `storage` exists.
/// - [`LinkError::Io`] if creating the directory, file, or link fails.
pub fn initialize(home: &Path, storage: &Path) -> Result<PathBuf> {
    let pointer = pointer_path(home);
    let storage = paths::normalize(storage);
    if fs::entry_exists(&pointer) {
        return Err(LinkError::ConfigExists { path: pointer });
    }
    if fs::entry_exists(&storage) {
        return Err(LinkError::DirExists { path: storage });
    }

    std::fs::create_dir_all(&storage).map_err(LinkError::io("create directory", &storage))?;
    let settings = storage.join(SETTINGS_NAME);
    std::fs::write(&settings, settings::DEFAULT_SETTINGS)
        .map_err(LinkError::io("write settings", &settings))?;
    fs::create_symlink(&settings, &pointer)?;
    Ok(settings)
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;

    fn home() -> (tempfile::TempDir, PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let home = dunce::canonicalize(tmp.path()).unwrap();
        (tmp, home)
    }

    // -----------------------------------------------------------------------
    // initialize
    // -----------------------------------------------------------------------

    #[test]
    fn initialize_creates_directory_settings_and_pointer() {
        let (_tmp, home) = home();
        let storage = home.join("dotdir");

        let settings = initialize(&home, &storage).unwrap();

        assert_eq!(settings, storage.join(SETTINGS_NAME));
        assert!(settings.is_file());
        assert_eq!(std::fs::read_link(pointer_path(&home)).unwrap(), settings);
        assert_eq!(discover(&home).unwrap(), storage);
    }

    #[test]
    fn initialize_with_existing_pointer_is_config_exists() {
        let (_tmp, home) = home();
        let storage = home.join("dotdir");
        std::fs::write(pointer_path(&home), "").unwrap();

        let err = initialize(&home, &storage).unwrap_err();

        assert!(matches!(err, LinkError::ConfigExists { .. }));
        assert!(!storage.exists());
    }

    #[test]
    fn initialize_with_existing_dir_is_dir_exists() {
        let (_tmp, home) = home();
        let storage = home.join("dotdir");
        std::fs::create_dir(&storage).unwrap();

        let err = initialize(&home, &storage).unwrap_err();

        assert!(matches!(err, LinkError::DirExists { .. }));
        assert!(!fs::entry_exists(&pointer_path(&home)));
    }

    #[test]
    fn initialize_twice_fails() {
        let (_tmp, home) = home();
        let storage = home.join("store");
        initialize(&home, &storage).unwrap();

        let err = initialize(&home, &storage).unwrap_err();

        assert!(matches!(
            err,
            LinkError::ConfigExists { .. } | LinkError::DirExists { .. }
        ));
    }

    // -----------------------------------------------------------------------
    // discover
    // -----------------------------------------------------------------------

    #[test]
    fn discover_without_pointer_is_missing() {
        let (_tmp, home) = home();
        assert!(matches!(
            discover(&home).unwrap_err(),
            LinkError::ConfigMissing { .. }
        ));
    }

    #[test]
    fn discover_with_dangling_pointer_is_missing() {
        let (_tmp, home) = home();
        symlink(home.join("dotdir/dotfiles"), pointer_path(&home)).unwrap();
        assert!(matches!(
            discover(&home).unwrap_err(),
            LinkError::ConfigMissing { .. }
        ));
    }

    #[test]
    fn discover_with_regular_file_is_invalid() {
        let (_tmp, home) = home();
        std::fs::write(pointer_path(&home), "").unwrap();
        assert!(matches!(
            discover(&home).unwrap_err(),
            LinkError::ConfigInvalid { .. }
        ));
    }

    #[test]
    fn discover_with_directory_target_is_invalid() {
        let (_tmp, home) = home();
        let target = home.join("dotdir/dotfiles");
        std::fs::create_dir_all(&target).unwrap();
        symlink(&target, pointer_path(&home)).unwrap();
        assert!(matches!(
            discover(&home).unwrap_err(),
            LinkError::ConfigInvalid { .. }
        ));
    }

    #[test]
    fn discover_with_file_target_returns_its_parent() {
        let (_tmp, home) = home();
        let storage = home.join("dotdir");
        std::fs::create_dir(&storage).unwrap();
        std::fs::write(storage.join(SETTINGS_NAME), "").unwrap();
        symlink("dotdir/dotfiles", pointer_path(&home)).unwrap();

        assert_eq!(discover(&home).unwrap(), storage);
        assert_eq!(
            settings_path(&home).unwrap(),
            storage.join(SETTINGS_NAME)
        );
    }
}
