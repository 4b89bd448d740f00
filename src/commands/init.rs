//! Init command implementation.
use anyhow::Result;

use crate::cli::{GlobalOpts, InitOpts};
use crate::config;
use crate::logging::Logger;

/// Run the init command.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined, a discovery
/// pointer or the target directory already exists, or creating either fails.
pub fn run(global: &GlobalOpts, opts: &InitOpts, log: &Logger) -> Result<()> {
    let home = super::resolve_home(global)?;
    let storage = super::absolute(&opts.dir)?;

    log.stage("Initializing dotfiles directory");
    let settings = config::initialize(&home, &storage)?;
    log.info(&format!("created {}", storage.display()));
    log.info(&format!(
        "{} -> {}",
        config::pointer_path(&home).display(),
        settings.display()
    ));
    Ok(())
}
