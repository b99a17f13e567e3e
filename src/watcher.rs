//! Long-running watch loop.
//!
//! The [`Watcher`] owns the scan state and repeatedly runs reconciliation
//! cycles until a stop is requested. A failed cycle is logged and followed by
//! the error backoff instead of the regular interval; it never ends the loop.

use crate::config::WatchTarget;
use crate::signals::StopFlag;
use crate::tracking::{CycleReport, Reconciler, ScanStateStore};
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Longest uninterrupted sleep; bounds how long a stop request goes unnoticed.
const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// Classification of a failed cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// An I/O error anywhere in the error chain (listing, opening, reading)
    Io,
    /// Any other error, including panics inside the cycle
    Unexpected,
}

/// Result of one cycle as seen by the loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The cycle ran to completion
    Completed(CycleReport),
    /// The cycle was aborted; state changes made before the failure are kept
    Failed(FailureKind),
}

/// Counters reported when the loop stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchStats {
    /// Cycles attempted
    pub cycles: u64,
    /// Cycles that failed
    pub failed_cycles: u64,
    /// Match events reported
    pub matches: u64,
}

/// Final summary returned by [`Watcher::run`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchSummary {
    /// Time since the watcher was created
    pub uptime: Duration,
    /// Counters at shutdown
    pub stats: WatchStats,
}

/// Polling loop over a single watch target
#[derive(Debug)]
pub struct Watcher {
    /// Immutable settings
    target: WatchTarget,
    /// Progress of every tracked file
    store: ScanStateStore,
    /// Set by signal handlers or callers to end the loop
    stop: StopFlag,
    /// Creation time, for uptime
    started: Instant,
    /// Running counters
    stats: WatchStats,
}

impl Watcher {
    /// Create a watcher with an empty scan state.
    #[must_use]
    pub fn new(target: WatchTarget, stop: StopFlag) -> Self {
        Self {
            target,
            store: ScanStateStore::new(),
            stop,
            started: Instant::now(),
            stats: WatchStats::default(),
        }
    }

    /// Current scan state.
    #[must_use]
    pub const fn store(&self) -> &ScanStateStore {
        &self.store
    }

    /// Counters so far.
    #[must_use]
    pub const fn stats(&self) -> WatchStats {
        self.stats
    }

    /// Run cycles until a stop is requested, then log and return the summary.
    pub fn run(mut self) -> WatchSummary {
        info!(
            directory = %self.target.directory.display(),
            extension = %self.target.extension,
            magic = %self.target.magic,
            interval = ?self.target.interval,
            "starting dirwatcher"
        );

        while !self.stop.is_stop_requested() {
            let pause = match self.run_cycle() {
                CycleOutcome::Completed(_) => self.target.interval,
                CycleOutcome::Failed(_) => self.target.error_backoff,
            };
            self.sleep(pause);
        }

        match self.stop.received_signal() {
            Some(signal) => warn!("received {signal}, shutting down"),
            None => info!("stop requested, shutting down"),
        }

        let summary = WatchSummary {
            uptime: self.started.elapsed(),
            stats: self.stats,
        };
        info!(
            cycles = summary.stats.cycles,
            failed_cycles = summary.stats.failed_cycles,
            matches = summary.stats.matches,
            "stopped dirwatcher, uptime was {}",
            humantime::format_duration(Duration::from_secs(summary.uptime.as_secs()))
        );
        summary
    }

    /// Run a single reconciliation cycle, isolating any failure.
    pub fn run_cycle(&mut self) -> CycleOutcome {
        self.stats.cycles += 1;

        let reconciler = Reconciler::new(&self.target);
        let store = &mut self.store;
        let result = panic::catch_unwind(AssertUnwindSafe(|| reconciler.reconcile(store)));

        let failure = match result {
            Ok(Ok(report)) => {
                self.stats.matches += report.matches.len() as u64;
                debug!(
                    tracked = self.store.len(),
                    added = report.added.len(),
                    removed = report.removed.len(),
                    matches = report.matches.len(),
                    "cycle complete"
                );
                return CycleOutcome::Completed(report);
            }
            Ok(Err(err)) => {
                let kind = classify(&err);
                match kind {
                    FailureKind::Io => error!("{err:#}"),
                    FailureKind::Unexpected => error!("unhandled error: {err:#}"),
                }
                kind
            }
            Err(payload) => {
                error!("unhandled error: cycle panicked: {}", panic_message(payload.as_ref()));
                FailureKind::Unexpected
            }
        };

        self.stats.failed_cycles += 1;
        debug!(backoff = ?self.target.error_backoff, "backing off after failed cycle");
        CycleOutcome::Failed(failure)
    }

    /// Sleep for `duration`, returning early once a stop is requested.
    ///
    /// A duration too large to be represented as a deadline sleeps until stop.
    fn sleep(&self, duration: Duration) {
        let deadline = Instant::now().checked_add(duration);
        while !self.stop.is_stop_requested() {
            let slice = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    (deadline - now).min(SLEEP_SLICE)
                }
                None => SLEEP_SLICE,
            };
            std::thread::sleep(slice);
        }
    }
}

/// I/O anywhere in the chain makes the failure an I/O failure.
#[must_use]
pub fn classify(err: &anyhow::Error) -> FailureKind {
    if err.chain().any(|cause| cause.is::<std::io::Error>()) {
        FailureKind::Io
    } else {
        FailureKind::Unexpected
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result, anyhow};
    use std::fs;
    use tempfile::TempDir;

    fn fast_target(dir: &std::path::Path) -> Result<WatchTarget> {
        let mut target = WatchTarget::new(dir, "ERROR")?;
        target.interval = Duration::from_millis(10);
        target.error_backoff = Duration::from_millis(10);
        Ok(target)
    }

    #[test]
    fn test_classify() {
        let io = Err::<(), _>(std::io::Error::other("disk"))
            .context("Failed to list directory")
            .unwrap_err();
        assert_eq!(classify(&io), FailureKind::Io);
        assert_eq!(classify(&anyhow!("boom")), FailureKind::Unexpected);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("static message");
        assert_eq!(panic_message(payload.as_ref()), "static message");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn std::any::Any + Send> = Box::new(42);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }

    #[test]
    fn test_missing_directory_is_io_failure_then_recovers() -> Result<()> {
        let dir = TempDir::new()?;
        let watched = dir.path().join("later");
        let mut watcher = Watcher::new(fast_target(&watched)?, StopFlag::new());

        assert_eq!(watcher.run_cycle(), CycleOutcome::Failed(FailureKind::Io));
        assert_eq!(watcher.stats().failed_cycles, 1);

        fs::create_dir(&watched)?;
        fs::write(watched.join("a.txt"), "x\n")?;
        let CycleOutcome::Completed(report) = watcher.run_cycle() else {
            panic!("cycle should succeed once the directory exists");
        };
        assert_eq!(report.added, vec!["a.txt"]);
        assert_eq!(watcher.stats().cycles, 2);
        assert_eq!(watcher.store().get("a.txt"), Some(1));
        Ok(())
    }

    #[test]
    fn test_run_returns_immediately_when_already_stopped() -> Result<()> {
        let dir = TempDir::new()?;
        let stop = StopFlag::new();
        stop.request_stop();

        let summary = Watcher::new(fast_target(dir.path())?, stop).run();
        assert_eq!(summary.stats, WatchStats::default());
        Ok(())
    }

    #[test]
    fn test_run_stops_on_request_from_another_thread() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("a.txt"), "")?;
        let stop = StopFlag::new();
        let mut target = fast_target(dir.path())?;
        target.interval = Duration::from_secs(60);
        let watcher = Watcher::new(target, stop.clone());

        let handle = std::thread::spawn(move || watcher.run());
        std::thread::sleep(Duration::from_millis(200));
        stop.request_stop();

        let started = Instant::now();
        let summary = handle.join().map_err(|_| anyhow!("watcher thread panicked"))?;
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(summary.stats.cycles, 1);
        assert_eq!(summary.stats.failed_cycles, 0);
        Ok(())
    }

    #[test]
    fn test_interval_beyond_clock_range_sleeps_until_stop() -> Result<()> {
        let dir = TempDir::new()?;
        let stop = StopFlag::new();
        let mut target = fast_target(dir.path())?;
        target.interval = Duration::try_from_secs_f64(1e19)?;
        let watcher = Watcher::new(target, stop.clone());

        let handle = std::thread::spawn(move || watcher.run());
        std::thread::sleep(Duration::from_millis(200));
        stop.request_stop();

        let summary = handle.join().map_err(|_| anyhow!("watcher thread panicked"))?;
        assert_eq!(summary.stats.cycles, 1);
        assert_eq!(summary.stats.failed_cycles, 0);
        Ok(())
    }
}
