//! Process-wide append-only blacklist of URLs to never (re)fetch
//!
//! The blacklist is loaded once from a line-delimited log at startup, held
//! in memory for the process lifetime, and appended to synchronously on each
//! addition so a crash loses at most the in-flight entry. Entries are never
//! removed within a run.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

/// In-memory blacklist backed by a persisted log file.
///
/// `contains` is read-mostly and lock-light; `insert` serializes the log
/// append so concurrent crawl attempts cannot interleave partial lines.
pub struct Blacklist {
    entries: RwLock<HashSet<String>>,
    log: Mutex<File>,
    path: PathBuf,
}

impl Blacklist {
    /// Loads the blacklist from its log file, creating the file if absent.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the line-delimited log, one raw URL per line
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let mut entries = HashSet::new();

        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            for line in reader.lines() {
                let line = line?;
                let url = line.trim();
                if !url.is_empty() {
                    entries.insert(url.to_string());
                }
            }
        }

        let log = OpenOptions::new().create(true).append(true).open(path)?;

        tracing::info!(
            "Loaded {} blacklist entries from {}",
            entries.len(),
            path.display()
        );

        Ok(Self {
            entries: RwLock::new(entries),
            log: Mutex::new(log),
            path: path.to_path_buf(),
        })
    }

    /// Exact-string membership test.
    pub fn contains(&self, url: &str) -> bool {
        self.entries
            .read()
            .map(|set| set.contains(url))
            .unwrap_or(false)
    }

    /// Adds a URL to the set and appends one line to the log, flushed before
    /// returning. Re-inserting a known URL is a no-op that skips the append.
    pub fn insert(&self, url: &str) -> std::io::Result<()> {
        {
            let mut set = self
                .entries
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if !set.insert(url.to_string()) {
                return Ok(());
            }
        }

        let mut log = self
            .log
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(log, "{}", url)?;
        log.flush()?;

        tracing::info!("Blacklisted {}", url);
        Ok(())
    }

    /// Number of blacklisted URLs.
    pub fn len(&self) -> usize {
        self.entries.read().map(|set| set.len()).unwrap_or(0)
    }

    /// True when no URL is blacklisted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Path of the backing log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
