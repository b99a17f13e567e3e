//! Incremental tracking engine for files in a watched directory.
//!
//! Each cycle the directory is listed, the set of tracked files is brought in
//! line with the listing, and every tracked file is scanned from where the
//! previous cycle stopped. Lines are reported exactly once as long as files
//! only ever grow.
//!
//! # Architecture
//!
//! - [`crate::tracking::ScanStateStore`] - Maps file names to scan progress
//! - [`crate::tracking::LineScanner`] - Scans the unread tail of one file
//! - [`crate::tracking::Reconciler`] - Runs one cycle over the directory
//!
//! # Usage
//!
//! ```no_run
//! use dirwatcher::config::WatchTarget;
//! use dirwatcher::tracking::{Reconciler, ScanStateStore};
//!
//! # fn main() -> anyhow::Result<()> {
//! let target = WatchTarget::new("/var/log/app", "ERROR")?;
//! let reconciler = Reconciler::new(&target);
//! let mut store = ScanStateStore::new();
//!
//! let report = reconciler.reconcile(&mut store)?;
//! for event in &report.matches {
//!     println!("{}:{}: {}", event.file, event.line_number, event.line);
//! }
//! # Ok(())
//! # }
//! ```

pub mod reconciler;
pub mod scanner;
pub mod store;

pub use reconciler::{CycleReport, Reconciler};
pub use scanner::{LineScanner, MatchEvent, ScanOutcome};
pub use store::ScanStateStore;
