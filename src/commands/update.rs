//! Update command implementation.
use anyhow::Result;

use crate::cli::{GlobalOpts, UpdateOpts};
use crate::links::{LinkOutcome, paths};
use crate::logging::{ItemStatus, Logger};

/// Run the update command.
///
/// Links every top-level entry of the dotfiles directory into the home
/// directory as `~/.<name>`.  Entries whose dotfile is in the way are
/// recorded as skipped; the batch always runs to the end.
///
/// # Errors
///
/// Returns an error if the dotfiles directory cannot be located or read, or
/// the settings file is invalid.
pub fn run(global: &GlobalOpts, opts: &UpdateOpts, log: &Logger) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;

    log.stage("Linking dotfiles into home");
    let home = &setup.manager.dirs().home;
    for target in setup.storage_entries()? {
        let Some(file_name) = target.file_name() else {
            continue;
        };
        let name = home.join(paths::dotted(file_name)).display().to_string();
        match setup.manager.link_into_home(&target, opts.overwrite) {
            Ok(LinkOutcome::Linked(_)) => {
                let detail = format!("linked to {}", target.display());
                log.record_item(&name, ItemStatus::Ok, Some(&detail));
            }
            Ok(LinkOutcome::AlreadyLinked(_)) => {
                log.record_item(&name, ItemStatus::Ok, Some("already linked"));
            }
            Err(e) if e.is_expected() => {
                log.record_item(&name, ItemStatus::Skipped, Some(&e.to_string()));
            }
            Err(e) => {
                log.debug(&format!("{name}: {e:?}"));
                log.record_item(&name, ItemStatus::Failed, Some(&e.to_string()));
            }
        }
    }
    log.print_summary();
    Ok(())
}
