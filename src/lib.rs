//! Dotfile link manager.
//!
//! Moves dotfiles out of the home directory into a single dotfiles directory
//! (typically a version-controlled repository) and leaves a symbolic link in
//! their place, so the files keep working where programs expect them.
//!
//! The public API is organised into layers:
//!
//! - **[`links`]**: management predicates and the `manage` / `unmanage` /
//!   `link_into_home` operations
//! - **[`config`]**: the `~/.dotfiles` discovery pointer, `init`, and the
//!   settings file
//! - **[`commands`]**: top-level subcommand orchestration
//! - **[`logging`]**: console and log-file output with a per-run summary
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod links;
pub mod logging;
