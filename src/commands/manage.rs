//! Manage command implementation.
use anyhow::Result;

use crate::cli::{GlobalOpts, ManageOpts};
use crate::logging::Logger;

/// Run the manage command.
///
/// Each path is processed independently; a path that cannot be managed is
/// reported and recorded as failed without stopping the batch.
///
/// # Errors
///
/// Returns an error if the dotfiles directory cannot be located or the
/// settings file is invalid.
pub fn run(global: &GlobalOpts, opts: &ManageOpts, log: &Logger) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;

    log.stage("Managing dotfiles");
    super::run_each(log, &opts.paths, |path| {
        let target = setup.manager.manage(path)?;
        Ok(format!("moved to {}", target.display()))
    })
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::commands::test_support::Home;
    use crate::logging::{ItemStatus, capture};

    #[test]
    fn manage_links_every_path() {
        let h = Home::new();
        let cap = capture();
        let log = &cap.logger;
        let bashrc = h.file(".bashrc", "b");
        let vimrc = h.file(".vimrc", "v");

        run(
            &h.global(),
            &ManageOpts {
                paths: vec![bashrc.clone(), vimrc.clone()],
            },
            log,
        )
        .unwrap();

        assert!(Home::is_link(&bashrc));
        assert!(Home::is_link(&vimrc));
        assert_eq!(std::fs::read_to_string(h.storage.join("vimrc")).unwrap(), "v");
        assert_eq!(log.counts().failed, 0);
        assert_eq!(
            log.entries()[0].message,
            Some(format!("moved to {}", h.storage.join("bashrc").display()))
        );
    }

    #[test]
    fn manage_records_failures_and_continues() {
        let h = Home::new();
        let cap = capture();
        let log = &cap.logger;
        let plain = h.file("plain", "");
        let profile = h.file(".profile", "p");

        run(
            &h.global(),
            &ManageOpts {
                paths: vec![plain, h.path(".missing"), profile.clone()],
            },
            log,
        )
        .unwrap();

        let items = log.entries();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].status, ItemStatus::Failed);
        assert_eq!(items[1].status, ItemStatus::Failed);
        assert_eq!(items[2].status, ItemStatus::Ok);
        assert!(Home::is_link(&profile));
    }

    #[test]
    fn manage_without_init_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let cap = capture();
        let log = &cap.logger;
        let global = GlobalOpts {
            home: Some(tmp.path().to_path_buf()),
        };

        let result = run(
            &global,
            &ManageOpts {
                paths: vec![tmp.path().join(".bashrc")],
            },
            log,
        );

        assert!(result.is_err());
    }
}
