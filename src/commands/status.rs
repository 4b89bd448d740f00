//! Status command implementation.
use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::POINTER_NAME;
use crate::links::{ManagementState, paths};
use crate::logging::{ItemStatus, Logger};

/// Run the status command.
///
/// Reports the dotfiles directory, then every top-level dotfile that
/// corresponds to a storage entry or links into the dotfiles directory.
/// Broken links are reported as failed items.
///
/// # Errors
///
/// Returns an error if the discovery pointer is missing or invalid, or the
/// home or dotfiles directory cannot be read.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;
    let dirs = setup.manager.dirs();

    log.stage("Dotfiles directory");
    log.info(&format!("home: {}", dirs.home.display()));
    log.info(&format!("dotfiles: {}", dirs.storage.display()));

    log.stage("Checking dotfiles");
    let mut candidates = BTreeMap::new();
    for target in setup.storage_entries()? {
        if let Some(name) = target.file_name() {
            candidates.insert(dirs.home.join(paths::dotted(name)), true);
        }
    }
    for link in home_links(&dirs.home)? {
        candidates.entry(link).or_insert(false);
    }

    for (path, in_storage) in candidates {
        let state = setup.manager.state(&path)?;
        let name = path.display().to_string();
        match state {
            ManagementState::Managed => {
                log.record_item(&name, ItemStatus::Ok, None);
            }
            ManagementState::PartiallyManaged => {
                log.record_item(&name, ItemStatus::Ok, Some("partially managed"));
            }
            ManagementState::Broken => {
                log.record_item(&name, ItemStatus::Failed, Some("broken link"));
            }
            other if in_storage => {
                log.debug(&format!("{name} is {other}"));
                log.record_item(&name, ItemStatus::Skipped, Some("not linked"));
            }
            other => log.debug(&format!("{name} is {other}, ignoring")),
        }
    }
    log.print_summary();
    Ok(())
}

/// Dot-named symlinks directly inside `home`, excluding the discovery
/// pointer.
fn home_links(home: &std::path::Path) -> Result<Vec<PathBuf>> {
    let mut links = Vec::new();
    for entry in walkdir::WalkDir::new(home).min_depth(1).max_depth(1) {
        let entry = entry
            .with_context(|| format!("Failed to read home directory {}", home.display()))?;
        let dotted_link = entry.path_is_symlink()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| name != POINTER_NAME && paths::undot(name).is_some());
        if dotted_link {
            links.push(entry.into_path());
        }
    }
    Ok(links)
}
