// Shared helpers for integration tests.
//
// Provides a temporary home directory with an initialized dotfiles directory
// and a fluent builder so each integration test can set up an isolated
// environment without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use dotfiler::config;
use dotfiler::links::{Dirs, LinkManager, paths};

/// An isolated home directory at `<tmp>/home`, backed by a
/// [`tempfile::TempDir`].
///
/// The temporary path is canonicalized so that paths computed by the link
/// manager compare equal to paths built by the test.
pub struct TestHome {
    _tmp: tempfile::TempDir,
    /// The home directory.
    pub home: PathBuf,
    /// The dotfiles directory, `<home>/dotdir` unless changed by the builder.
    pub storage: PathBuf,
}

impl TestHome {
    /// Create an initialized home with the dotfiles directory at
    /// `<home>/dotdir`.
    pub fn new() -> Self {
        TestHomeBuilder::new().build()
    }

    /// Absolute path of `rel` inside the home directory.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.home.join(rel)
    }

    /// Absolute path of `rel` inside the dotfiles directory.
    pub fn stored(&self, rel: &str) -> PathBuf {
        self.storage.join(rel)
    }

    /// Write `content` to `rel` inside the home directory, creating parents.
    pub fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path(rel);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
        std::fs::write(&path, content).expect("write file");
        path
    }

    /// Create the directory `rel` inside the home directory.
    pub fn dir(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        std::fs::create_dir_all(&path).expect("create dir");
        path
    }

    /// Link manager built from the discovery pointer, the way commands do.
    pub fn manager(&self) -> LinkManager {
        let storage = config::discover(&self.home).expect("discover storage");
        LinkManager::new(Dirs::new(&self.home, storage))
    }
}

/// Fluent builder for [`TestHome`].
pub struct TestHomeBuilder {
    storage_rel: String,
    initialize: bool,
}

impl TestHomeBuilder {
    /// Begin building an initialized home with storage at `dotdir`.
    pub fn new() -> Self {
        Self {
            storage_rel: "dotdir".to_string(),
            initialize: true,
        }
    }

    /// Place the dotfiles directory at `rel` (relative to home, may use `..`
    /// to leave it).
    pub fn with_storage(mut self, rel: &str) -> Self {
        self.storage_rel = rel.to_string();
        self
    }

    /// Skip `init`, leaving the home without a discovery pointer.
    pub fn uninitialized(mut self) -> Self {
        self.initialize = false;
        self
    }

    /// Finish building and return the home.
    pub fn build(self) -> TestHome {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let home = dunce::canonicalize(tmp.path())
            .expect("canonicalize temp dir")
            .join("home");
        std::fs::create_dir(&home).expect("create home");
        let storage = paths::normalize(&home.join(&self.storage_rel));
        if self.initialize {
            config::initialize(&home, &storage).expect("initialize dotfiles directory");
        }
        TestHome {
            _tmp: tmp,
            home,
            storage,
        }
    }
}

/// Return `true` if `path` itself is a symbolic link.
pub fn is_link(path: &Path) -> bool {
    path.symlink_metadata()
        .is_ok_and(|m| m.file_type().is_symlink())
}
