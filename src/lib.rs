#![warn(missing_docs)]

//! # Dirwatcher - Incremental Directory Text Watcher
//!
//! Dirwatcher polls a directory, tracks every file with a given extension and
//! reports each line containing a magic text exactly once, as files appear,
//! disappear and grow between cycles. It is built for unattended, long-running
//! log monitoring: failed cycles are logged and retried, never fatal.
//!
//! ## Architecture
//!
//! - [`tracking`]: Scan state, incremental line scanner and directory reconciler
//! - [`watcher`]: Polling loop with error isolation and backoff
//! - [`config`]: Watch settings and the optional TOML configuration file
//! - [`cli`]: Command-line argument definitions
//! - [`signals`]: SIGINT/SIGTERM to stop-flag bridge
//! - [`logging`]: Tracing subscriber setup
//!
//! ## Example Usage
//!
//! ```no_run
//! use dirwatcher::config::WatchTarget;
//! use dirwatcher::signals::{STOP_SIGNALS, StopFlag};
//! use dirwatcher::watcher::Watcher;
//!
//! # fn main() -> anyhow::Result<()> {
//! let target = WatchTarget::new("/var/log/app", "ERROR")?;
//! let stop = StopFlag::new();
//! stop.install(&STOP_SIGNALS)?;
//!
//! let summary = Watcher::new(target, stop).run();
//! println!("ran {} cycles", summary.stats.cycles);
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Watch settings, defaults and configuration file handling.
pub mod config;

/// Tracing subscriber initialization.
pub mod logging;

/// Termination signal handling.
pub mod signals;

/// Incremental file tracking and scanning engine.
pub mod tracking;

/// Polling loop driving reconciliation cycles.
pub mod watcher;

/// Current version of the dirwatcher binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
