//! Directory reconciler.
//!
//! One call to [`Reconciler::reconcile`] is one cycle: list the directory,
//! bring the store in line with the listing, then scan every tracked file.
//! Additions and removals are computed from snapshots before the store is
//! touched, and both are applied before any scanning starts.

use crate::config::{StartPosition, WatchTarget};
use crate::tracking::scanner::{self, LineScanner, MatchEvent};
use crate::tracking::store::ScanStateStore;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use tracing::{debug, info};

/// What happened during one cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Files that started being tracked
    pub added: Vec<String>,
    /// Files that stopped being tracked
    pub removed: Vec<String>,
    /// Matches found, grouped by file in name order
    pub matches: Vec<MatchEvent>,
    /// Number of files scanned
    pub scanned: usize,
}

/// Runs reconciliation cycles for a watch target
#[derive(Debug, Clone, Copy)]
pub struct Reconciler<'a> {
    /// Directory, filter and magic text to work with
    target: &'a WatchTarget,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler for `target`
    #[must_use]
    pub const fn new(target: &'a WatchTarget) -> Self {
        Self { target }
    }

    /// Run one cycle against `store`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory cannot be listed (the store is left untouched)
    /// - A newly listed file cannot be measured or a tracked file cannot be
    ///   scanned (changes applied earlier in the cycle are kept)
    pub fn reconcile(&self, store: &mut ScanStateStore) -> Result<CycleReport> {
        let listed = self.list_candidates()?;
        let tracked = store.names();

        let added: Vec<String> = listed
            .iter()
            .filter(|name| !store.is_tracked(name))
            .cloned()
            .collect();
        let removed: Vec<String> = tracked
            .into_iter()
            .filter(|name| !listed.contains(name))
            .collect();

        for name in &removed {
            store.forget(name);
            info!(file = %name, "removed {name} from tracking");
        }

        for name in &added {
            let progress = self.initial_progress(name)?;
            store.track(name.clone(), progress);
            info!(file = %name, progress, "now tracking {name}");
        }

        let scanner = LineScanner::new(&self.target.magic);
        let mut matches = Vec::new();
        let mut scanned = 0;
        for name in store.names() {
            let progress = store
                .get(&name)
                .with_context(|| format!("Tracked file {name} vanished from the store"))?;
            let outcome = scanner
                .scan(&self.target.directory.join(&name), &name, progress)
                .with_context(|| format!("Failed to scan tracked file {name}"))?;
            if outcome.progress != progress {
                debug!(file = %name, from = progress, to = outcome.progress, "progress advanced");
            }
            store.set(&name, outcome.progress)?;
            matches.extend(outcome.matches);
            scanned += 1;
        }

        Ok(CycleReport {
            added,
            removed,
            matches,
            scanned,
        })
    }

    /// List the names of regular files that pass the extension filter
    fn list_candidates(&self) -> Result<BTreeSet<String>> {
        let directory = &self.target.directory;
        let entries = fs::read_dir(directory)
            .with_context(|| format!("Failed to list directory {}", directory.display()))?;

        let mut names = BTreeSet::new();
        for entry in entries {
            let entry = entry.with_context(|| {
                format!("Failed to read directory entry in {}", directory.display())
            })?;

            let Ok(name) = entry.file_name().into_string() else {
                debug!(path = %entry.path().display(), "skipping non UTF-8 file name");
                continue;
            };
            if !self.target.matches_extension(&name) {
                continue;
            }

            // Follows symlinks; a dangling link or a vanished entry is simply not a candidate.
            if fs::metadata(entry.path()).is_ok_and(|meta| meta.is_file()) {
                names.insert(name);
            }
        }
        Ok(names)
    }

    /// Progress a newly tracked file starts at
    fn initial_progress(&self, name: &str) -> Result<u64> {
        match self.target.start_position {
            StartPosition::Beginning => Ok(0),
            StartPosition::End => scanner::count_lines(&self.target.directory.join(name))
                .with_context(|| format!("Failed to measure newly tracked file {name}")),
        }
    }
}
