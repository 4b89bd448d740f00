//! Filesystem primitives used by the link manager.
//!
//! Every helper maps [`std::io::Error`] to [`LinkError::Io`] with the path it
//! failed on, so callers can propagate with `?` and still tell the user
//! which file was involved.
use std::fs;
use std::io;
use std::path::Path;

use crate::error::{LinkError, Result};

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(LinkError::io("create parent", parent))?;
    }
    Ok(())
}

/// Return `true` if anything (including a dangling symlink) exists at `path`.
#[must_use]
pub fn entry_exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Return `true` if `path` itself is a symbolic link.
///
/// # Errors
///
/// Returns an error for any metadata failure other than "not found".
pub fn is_symlink(path: &Path) -> Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(meta) => Ok(meta.file_type().is_symlink()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(LinkError::io("read metadata", path)(e)),
    }
}

/// Move `src` to `dst`, which must not exist.
///
/// Tries an atomic rename first; when that fails because the two paths live
/// on different filesystems the tree is copied and the source removed.
///
/// # Errors
///
/// Returns an error if neither the rename nor the copy fallback succeeds.
pub fn move_path(src: &Path, dst: &Path) -> Result<()> {
    match fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            tracing::debug!(
                "rename {} crosses filesystems, copying instead",
                src.display()
            );
            copy_tree(src, dst)?;
            remove_tree(src)
        }
        Err(e) => Err(LinkError::io("move", src)(e)),
    }
}

/// Copy a file, directory tree, or symlink from `src` to `dst`.
///
/// Symlinks inside the tree are recreated as symlinks rather than followed,
/// so a moved directory keeps its shape.
fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(src).map_err(LinkError::io("read metadata", src))?;
    if meta.file_type().is_symlink() {
        let raw = fs::read_link(src).map_err(LinkError::io("read link", src))?;
        return create_symlink(&raw, dst);
    }
    if !meta.is_dir() {
        fs::copy(src, dst).map_err(LinkError::io("copy", src))?;
        return Ok(());
    }
    fs::create_dir_all(dst).map_err(LinkError::io("create directory", dst))?;
    for entry in fs::read_dir(src).map_err(LinkError::io("read directory", src))? {
        let entry = entry.map_err(LinkError::io("read entry in", src))?;
        copy_tree(&entry.path(), &dst.join(entry.file_name()))?;
    }
    Ok(())
}

/// Remove a file, symlink, or whole directory tree at `path`.
fn remove_tree(path: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(path).map_err(LinkError::io("read metadata", path))?;
    if meta.is_dir() {
        fs::remove_dir_all(path).map_err(LinkError::io("remove directory", path))
    } else {
        remove_symlink(path)
    }
}

/// Create a symlink at `link` pointing to `target`.
///
/// # Errors
///
/// Returns an error if the link cannot be created (e.g. `link` exists).
pub fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link).map_err(LinkError::io("create symlink", link))
    }

    #[cfg(windows)]
    {
        let result = if target.is_dir() {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        };
        result.map_err(LinkError::io("create symlink", link))
    }
}

/// Remove a symlink (or plain file), handling platform differences.
///
/// On Windows, directory symlinks must be removed with `remove_dir` (not
/// `remove_file`), so the raw `FILE_ATTRIBUTE_DIRECTORY` flag is consulted.
///
/// # Errors
///
/// Returns an error if the entry cannot be removed.
pub fn remove_symlink(path: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(path).map_err(LinkError::io("read metadata", path))?;
    if is_dir_like(&meta) {
        fs::remove_dir(path).map_err(LinkError::io("remove", path))
    } else {
        fs::remove_file(path).map_err(LinkError::io("remove", path))
    }
}

/// Remove an existing file or symlink at `path`, ignoring absence.
///
/// # Errors
///
/// Returns an error if the path exists but cannot be removed.
pub fn remove_existing(path: &Path) -> Result<()> {
    match remove_symlink(path) {
        Err(LinkError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Remove now-empty directories from `dir` upward, stopping at (and never
/// removing) `root` or the first non-empty directory.
pub fn prune_empty_dirs(dir: &Path, root: &Path) {
    let mut current = Some(dir);
    while let Some(d) = current {
        if d == root || !d.starts_with(root) {
            break;
        }
        // `remove_dir` refuses non-empty directories, which ends the walk.
        if fs::remove_dir(d).is_err() {
            break;
        }
        tracing::debug!("pruned empty directory {}", d.display());
        current = d.parent();
    }
}

/// Check if metadata represents a directory-like entry.
/// On Windows, `symlink_metadata().is_dir()` returns `false` for directory symlinks,
/// so we check the raw `FILE_ATTRIBUTE_DIRECTORY` bit instead.
fn is_dir_like(meta: &fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        meta.is_dir()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ensure_parent_dir_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("file.txt");
        ensure_parent_dir(&nested).unwrap();
        assert!(dir.path().join("a").join("b").is_dir());
    }

    #[test]
    fn move_path_moves_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.txt");
        let dst = dir.path().join("dst.txt");
        fs::write(&src, b"hello").unwrap();

        move_path(&src, &dst).unwrap();

        assert!(!entry_exists(&src));
        assert_eq!(fs::read(&dst).unwrap(), b"hello");
    }

    #[test]
    fn move_path_moves_directory_tree() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("sub")).unwrap();
        fs::write(src.join("sub/b.txt"), b"bbb").unwrap();
        let dst = dir.path().join("dst");

        move_path(&src, &dst).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read(dst.join("sub/b.txt")).unwrap(), b"bbb");
    }

    #[test]
    fn move_path_reports_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = move_path(&dir.path().join("nope"), &dir.path().join("dst")).unwrap_err();
        assert!(matches!(err, LinkError::Io { action: "move", .. }));
    }

    #[test]
    fn copy_tree_copies_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("sub")).unwrap();
        fs::write(src.join("a.txt"), b"aaa").unwrap();
        fs::write(src.join("sub/b.txt"), b"bbb").unwrap();
        let dst = dir.path().join("out");

        copy_tree(&src, &dst).unwrap();
        remove_tree(&src).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read(dst.join("a.txt")).unwrap(), b"aaa");
        assert_eq!(fs::read(dst.join("sub/b.txt")).unwrap(), b"bbb");
    }

    #[cfg(unix)]
    #[test]
    fn copy_tree_recreates_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        std::os::unix::fs::symlink("/nonexistent/target", src.join("link")).unwrap();
        let dst = dir.path().join("out");

        copy_tree(&src, &dst).unwrap();

        assert!(is_symlink(&dst.join("link")).unwrap());
        assert_eq!(
            fs::read_link(dst.join("link")).unwrap(),
            Path::new("/nonexistent/target")
        );
    }

    #[test]
    fn remove_existing_noop_when_path_absent() {
        let dir = tempfile::tempdir().unwrap();
        remove_existing(&dir.path().join("nonexistent")).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn remove_existing_removes_broken_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink("/nonexistent/target", &link).unwrap();
        assert!(entry_exists(&link));
        remove_existing(&link).unwrap();
        assert!(!entry_exists(&link));
    }

    #[cfg(unix)]
    #[test]
    fn is_symlink_distinguishes_links() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file");
        let link = dir.path().join("link");
        fs::write(&file, "x").unwrap();
        create_symlink(&file, &link).unwrap();

        assert!(is_symlink(&link).unwrap());
        assert!(!is_symlink(&file).unwrap());
        assert!(!is_symlink(&dir.path().join("missing")).unwrap());
    }

    #[test]
    fn prune_empty_dirs_stops_at_root_and_non_empty() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("store");
        fs::create_dir_all(root.join("keep/a/b")).unwrap();
        fs::write(root.join("keep/file"), "x").unwrap();

        prune_empty_dirs(&root.join("keep/a/b"), &root);

        assert!(!root.join("keep/a").exists());
        assert!(root.join("keep").is_dir());
        assert!(root.is_dir());
    }

    #[test]
    fn prune_empty_dirs_never_removes_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("store");
        fs::create_dir(&root).unwrap();

        prune_empty_dirs(&root, &root);

        assert!(root.is_dir());
    }
}
