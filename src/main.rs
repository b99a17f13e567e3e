use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use dirwatcher::cli::Cli;
use dirwatcher::config::WatchTarget;
use dirwatcher::logging::{self, Verbosity};
use dirwatcher::signals::{STOP_SIGNALS, StopFlag};
use dirwatcher::watcher::Watcher;
use std::process;

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    // Handlers go in first so an early Ctrl+C is not lost
    let stop = StopFlag::new();
    stop.install(&STOP_SIGNALS)?;

    let cli = Cli::parse();
    logging::init(Verbosity::from_flags(cli.verbose, cli.quiet))?;

    let target = WatchTarget::from_cli(&cli)?;
    Watcher::new(target, stop).run();

    Ok(())
}
