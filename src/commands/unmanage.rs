//! Unmanage command implementation.
use anyhow::Result;

use crate::cli::{GlobalOpts, UnmanageOpts};
use crate::logging::Logger;

/// Run the unmanage command.
///
/// Managed links are replaced by their content; for a partially managed
/// directory every managed link below it is restored.
///
/// # Errors
///
/// Returns an error if the dotfiles directory cannot be located or the
/// settings file is invalid.
pub fn run(global: &GlobalOpts, opts: &UnmanageOpts, log: &Logger) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;

    log.stage("Restoring dotfiles");
    super::run_each(log, &opts.paths, |path| {
        let restored = setup.manager.unmanage(path)?;
        for p in &restored {
            log.debug(&format!("restored {}", p.display()));
        }
        Ok(match restored.as_slice() {
            [only] if only == path => "restored".to_string(),
            _ => format!("restored {} link(s)", restored.len()),
        })
    })
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::commands::test_support::Home;
    use crate::links::{Dirs, LinkManager};
    use crate::logging::{ItemStatus, capture};

    #[test]
    fn unmanage_restores_managed_paths() {
        let h = Home::new();
        let cap = capture();
        let log = &cap.logger;
        let bashrc = h.file(".bashrc", "b");
        let nested = h.file(".config/app/rc", "n");
        let manager = LinkManager::new(Dirs::new(&h.home, &h.storage));
        manager.manage(&bashrc).unwrap();
        manager.manage(&nested).unwrap();

        run(
            &h.global(),
            &UnmanageOpts {
                paths: vec![bashrc.clone(), h.path(".config")],
            },
            log,
        )
        .unwrap();

        assert!(!Home::is_link(&bashrc));
        assert!(!Home::is_link(&nested));
        assert_eq!(std::fs::read_to_string(&nested).unwrap(), "n");
        assert!(!h.storage.join("config").exists());
        assert_eq!(log.counts().failed, 0);
        let details: Vec<_> = log.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(
            details,
            vec![
                Some("restored".to_string()),
                Some("restored 1 link(s)".to_string())
            ]
        );
    }

    #[test]
    fn unmanage_unmanaged_path_is_recorded_as_failed() {
        let h = Home::new();
        let cap = capture();
        let log = &cap.logger;
        let plain = h.file(".plain", "");

        run(&h.global(), &UnmanageOpts { paths: vec![plain] }, log).unwrap();

        let items = log.entries();
        assert_eq!(items[0].status, ItemStatus::Failed);
        assert!(items[0].message.as_deref().unwrap().contains("is not managed"));
    }
}
