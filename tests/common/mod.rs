#![allow(dead_code)]

use anyhow::Result;
use dirwatcher::config::{StartPosition, WatchTarget};
use dirwatcher::tracking::{CycleReport, Reconciler, ScanStateStore};
use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Watched temporary directory with its own scan state
pub struct WatchDir {
    pub temp_dir: TempDir,
    pub target: WatchTarget,
    pub store: ScanStateStore,
}

impl WatchDir {
    /// Watch a fresh directory for `magic` in `.txt` files
    pub fn new(magic: &str) -> Result<Self> {
        Self::with_start(magic, StartPosition::End)
    }

    pub fn with_start(magic: &str, start_position: StartPosition) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let mut target = WatchTarget::new(temp_dir.path(), magic)?;
        target.start_position = start_position;
        Ok(Self {
            temp_dir,
            target,
            store: ScanStateStore::new(),
        })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.path().join(name)
    }

    pub fn write(&self, name: &str, content: &str) -> Result<()> {
        fs::write(self.file(name), content)?;
        Ok(())
    }

    /// Append each line followed by a newline, creating the file if needed
    pub fn append_lines<S: AsRef<str>>(&self, name: &str, lines: &[S]) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.file(name))?;
        for line in lines {
            writeln!(file, "{}", line.as_ref())?;
        }
        Ok(())
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        fs::remove_file(self.file(name))?;
        Ok(())
    }

    /// Run one reconciliation cycle
    pub fn cycle(&mut self) -> Result<CycleReport> {
        Reconciler::new(&self.target).reconcile(&mut self.store)
    }

    pub fn tracked(&self) -> BTreeSet<String> {
        self.store.names().into_iter().collect()
    }
}
