//! Incremental line scanner.
//!
//! The `LineScanner` reads a file from the start, skips the lines a previous
//! scan already covered and reports every later line that contains the magic
//! text. Content is handled as bytes so a stray invalid UTF-8 sequence never
//! aborts a scan.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

/// A line containing the magic text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEvent {
    /// File name relative to the watch directory
    pub file: String,
    /// 1-based line number
    pub line_number: u64,
    /// Line content without its line terminator
    pub line: String,
}

/// Result of scanning one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Total number of lines in the file at scan time, the new progress
    pub progress: u64,
    /// Matches found beyond the previous progress, in line order
    pub matches: Vec<MatchEvent>,
}

/// Scanner for the unread tail of tracked files
#[derive(Debug, Clone, Copy)]
pub struct LineScanner<'a> {
    /// Case-sensitive text to look for
    magic: &'a str,
}

impl<'a> LineScanner<'a> {
    /// Create a scanner looking for `magic`
    #[must_use]
    pub const fn new(magic: &'a str) -> Self {
        Self { magic }
    }

    /// Scan `path`, skipping the first `progress` lines
    ///
    /// Every match is logged as it is found and collected into the outcome.
    /// A trailing line without a terminator counts as a line. If the file has
    /// fewer than `progress` lines nothing is reported and the smaller count is
    /// returned.
    ///
    /// # Arguments
    ///
    /// * `path` - File to read
    /// * `name` - Name reported in match events
    /// * `progress` - Number of lines already scanned
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub fn scan(&self, path: &Path, name: &str, progress: u64) -> Result<ScanOutcome> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open {name} for scanning"))?;
        let mut reader = BufReader::new(file);

        let mut buf = Vec::new();
        let mut line_number = 0u64;
        let mut matches = Vec::new();

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .with_context(|| format!("Failed to read line {} of {name}", line_number + 1))?;
            if read == 0 {
                break;
            }
            line_number += 1;

            if line_number <= progress {
                continue;
            }

            let line = trim_line_ending(&buf);
            if contains(line, self.magic.as_bytes()) {
                let event = MatchEvent {
                    file: name.to_string(),
                    line_number,
                    line: String::from_utf8_lossy(line).into_owned(),
                };
                info!(
                    file = %event.file,
                    line = event.line_number,
                    content = %event.line,
                    "found magic text {:?} on line {} in file {}",
                    self.magic,
                    event.line_number,
                    event.file
                );
                matches.push(event);
            }
        }

        Ok(ScanOutcome {
            progress: line_number,
            matches,
        })
    }
}

/// Count the lines of a file the way [`LineScanner::scan`] numbers them
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn count_lines(path: &Path) -> Result<u64> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} for line counting", path.display()))?;
    let mut reader = BufReader::new(file);

    let mut lines = 0u64;
    let mut last_byte = None;
    loop {
        let chunk = reader
            .fill_buf()
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if chunk.is_empty() {
            break;
        }
        lines += chunk.iter().filter(|&&b| b == b'\n').count() as u64;
        last_byte = chunk.last().copied();
        let len = chunk.len();
        reader.consume(len);
    }

    if last_byte.is_some_and(|b| b != b'\n') {
        lines += 1;
    }
    Ok(lines)
}

/// Strip a trailing `\n` or `\r\n`
fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Byte-wise substring test; the empty needle is contained everywhere
fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|window| window == needle)
}
