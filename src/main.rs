//! `dotfiler` command-line entry point.
use anyhow::Result;
use clap::Parser;

use dotfiler::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    if matches!(args.command, cli::Command::Version) {
        commands::version::run();
        return Ok(());
    }

    let name = args.command.name();
    let log_file = logging::init_subscriber(args.verbose, name);
    let log = logging::Logger::new(log_file);

    match &args.command {
        cli::Command::Init(opts) => commands::init::run(&args.global, opts, &log),
        cli::Command::Manage(opts) => commands::manage::run(&args.global, opts, &log),
        cli::Command::Unmanage(opts) => commands::unmanage::run(&args.global, opts, &log),
        cli::Command::Update(opts) => commands::update::run(&args.global, opts, &log),
        cli::Command::Status => commands::status::run(&args.global, &log),
        cli::Command::Version => Ok(()),
    }
}
