//! Exact-match suppression of known-neutral values.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Set of trimmed exact strings that suppress findings.
///
/// Backed by a line-delimited UTF-8 file; additions are appended under
/// the write lock so readers never observe a partially updated set.
#[derive(Debug, Default)]
pub struct Whitelist {
    items: RwLock<HashSet<String>>,
    path: PathBuf,
}

impl Whitelist {
    /// Load the whitelist from `path`. A missing file yields an empty
    /// set and is not an error.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read.
    pub fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut items = HashSet::new();

        match fs::read_to_string(&path) {
            Ok(contents) => {
                for line in contents.lines() {
                    let line = line.trim();
                    if !line.is_empty() {
                        items.insert(line.to_string());
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }

        Ok(Self {
            items: RwLock::new(items),
            path,
        })
    }

    /// Whether the trimmed value is whitelisted.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        let items = self.items.read().unwrap_or_else(|e| e.into_inner());
        items.contains(value.trim())
    }

    /// Add a value and append it to the backing file.
    ///
    /// Empty values and duplicates are ignored.
    ///
    /// # Errors
    /// Returns error if the append fails; the in-memory set keeps the
    /// value either way.
    pub fn add(&self, value: &str) -> std::io::Result<()> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(());
        }

        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());
        if !items.insert(value.to_string()) {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        writeln!(file, "{value}")?;
        Ok(())
    }

    /// Number of whitelisted values.
    #[must_use]
    pub fn len(&self) -> usize {
        let items = self.items.read().unwrap_or_else(|e| e.into_inner());
        items.len()
    }

    /// Whether the whitelist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
