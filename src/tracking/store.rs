//! Scan progress for every tracked file.
//!
//! Progress is the number of lines of a file that have already been scanned.
//! The store is the only owner of this state; the reconciler and scanner read
//! and write it once per cycle and never keep copies across cycles.

use anyhow::{Result, bail};
use std::collections::BTreeMap;

/// Mapping from file name (relative to the watch directory) to scan progress
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStateStore {
    /// Ordered so cycles visit files in a stable order
    progress: BTreeMap<String, u64>,
}

impl ScanStateStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `name` with the given initial progress
    ///
    /// Re-tracking a name that is already present resets its progress.
    pub fn track(&mut self, name: impl Into<String>, progress: u64) {
        self.progress.insert(name.into(), progress);
    }

    /// Stop tracking `name`, discarding its progress
    ///
    /// Returns the discarded progress, or `None` if the name was not tracked.
    pub fn forget(&mut self, name: &str) -> Option<u64> {
        self.progress.remove(name)
    }

    /// Progress of a tracked file
    #[must_use]
    pub fn get(&self, name: &str) -> Option<u64> {
        self.progress.get(name).copied()
    }

    /// Update the progress of a tracked file
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not tracked. Updates never create entries;
    /// only [`track`](Self::track) does.
    pub fn set(&mut self, name: &str, progress: u64) -> Result<()> {
        match self.progress.get_mut(name) {
            Some(current) => {
                *current = progress;
                Ok(())
            }
            None => bail!("Cannot update progress of untracked file: {name}"),
        }
    }

    /// Check if a file is tracked
    #[must_use]
    pub fn is_tracked(&self, name: &str) -> bool {
        self.progress.contains_key(name)
    }

    /// Snapshot of the tracked names, in order
    ///
    /// The returned vector is independent of the store, so callers can mutate
    /// the store while walking it.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.progress.keys().cloned().collect()
    }

    /// Number of tracked files
    #[must_use]
    pub fn len(&self) -> usize {
        self.progress.len()
    }

    /// Check if nothing is tracked
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.progress.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_and_get() {
        let mut store = ScanStateStore::new();
        assert!(store.is_empty());

        store.track("a.txt", 2);
        assert_eq!(store.get("a.txt"), Some(2));
        assert!(store.is_tracked("a.txt"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("b.txt"), None);
    }

    #[test]
    fn test_track_resets_progress() {
        let mut store = ScanStateStore::new();
        store.track("a.txt", 10);
        store.track("a.txt", 0);
        assert_eq!(store.get("a.txt"), Some(0));
    }

    #[test]
    fn test_forget() {
        let mut store = ScanStateStore::new();
        store.track("a.txt", 3);

        assert_eq!(store.forget("a.txt"), Some(3));
        assert!(!store.is_tracked("a.txt"));
        assert_eq!(store.forget("a.txt"), None);
    }

    #[test]
    fn test_set_requires_tracked_name() -> Result<()> {
        let mut store = ScanStateStore::new();
        store.track("a.txt", 0);

        store.set("a.txt", 5)?;
        assert_eq!(store.get("a.txt"), Some(5));

        store.forget("a.txt");
        assert!(store.set("a.txt", 6).is_err());
        assert!(!store.is_tracked("a.txt"));
        Ok(())
    }

    #[test]
    fn test_names_snapshot_is_sorted_and_detached() {
        let mut store = ScanStateStore::new();
        store.track("c.txt", 0);
        store.track("a.txt", 0);
        store.track("b.txt", 0);

        let names = store.names();
        assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);

        for name in &names {
            store.forget(name);
        }
        assert!(store.is_empty());
    }
}
