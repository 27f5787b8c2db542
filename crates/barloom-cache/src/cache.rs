//! On-disk parquet cache.

use barloom_format::FormatError;
use barloom_types::{BarTable, DateRange, Interval};
use directories::ProjectDirs;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cache_key;

/// Errors that can occur during cache operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to create a directory.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to open a cache entry for reading.
    #[error("Failed to read cache entry '{path}': {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write a cache entry.
    #[error("Failed to write cache entry '{path}': {source}")]
    WriteFile {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A cache entry holds malformed parquet data.
    #[error("Malformed cache entry '{path}': {source}")]
    Malformed {
        /// The offending entry.
        path: PathBuf,
        /// The underlying format error.
        source: FormatError,
    },
}

/// On-disk cache of bar query results, one parquet file per query.
///
/// Entries hold normalized UTC bars exactly as fetched, before any
/// session filtering or resampling, so one entry serves every
/// presentation of the same query.
#[derive(Debug, Clone)]
pub struct BarCache {
    root: PathBuf,
}

impl BarCache {
    /// Creates a cache rooted at the given directory.
    ///
    /// The directory is created if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(root: PathBuf) -> Result<Self, CacheError> {
        if !root.exists() {
            fs::create_dir_all(&root).map_err(|e| CacheError::CreateDir {
                path: root.clone(),
                source: e,
            })?;
        }
        Ok(Self { root })
    }

    /// Returns the default cache directory.
    ///
    /// Uses the platform cache location (e.g. `~/.cache/barloom/` on
    /// Linux), falling back to `~/.barloom/` if it cannot be
    /// determined.
    #[must_use]
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "barloom").map_or_else(dirs_fallback, |proj_dirs| {
            proj_dirs.cache_dir().to_path_buf()
        })
    }

    /// Creates a cache at the default path.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn with_default_path() -> Result<Self, CacheError> {
        Self::new(Self::default_path())
    }

    /// Returns the cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the absolute path of the entry for one query.
    #[must_use]
    pub fn entry_path(&self, symbol: &str, interval: Interval, range: DateRange) -> PathBuf {
        self.root.join(cache_key(symbol, interval, range))
    }

    /// Loads the cached table for a query, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing entry cannot be read or holds
    /// malformed data.
    pub fn load(
        &self,
        symbol: &str,
        interval: Interval,
        range: DateRange,
    ) -> Result<Option<BarTable>, CacheError> {
        let path = self.entry_path(symbol, interval, range);
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(&path).map_err(|e| CacheError::ReadFile {
            path: path.clone(),
            source: e,
        })?;
        let table = barloom_format::read_bars(file)
            .map_err(|e| CacheError::Malformed { path, source: e })?;
        tracing::debug!(symbol, %interval, %range, rows = table.len(), "cache hit");
        Ok(Some(table))
    }

    /// Saves a table as the entry for a query, replacing any existing
    /// entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be written.
    pub fn save(
        &self,
        symbol: &str,
        interval: Interval,
        range: DateRange,
        table: &BarTable,
    ) -> Result<(), CacheError> {
        let path = self.entry_path(symbol, interval, range);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| CacheError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let file = File::create(&path).map_err(|e| CacheError::WriteFile {
            path: path.clone(),
            source: e,
        })?;
        barloom_format::write_bars(table, file).map_err(|e| match e {
            FormatError::Io(source) => CacheError::WriteFile {
                path: path.clone(),
                source,
            },
            other => CacheError::Malformed {
                path: path.clone(),
                source: other,
            },
        })?;
        tracing::debug!(symbol, %interval, %range, rows = table.len(), "cache entry written");
        Ok(())
    }
}

/// Fallback for determining home directory.
fn dirs_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".barloom")
}

#[cfg(test)]
mod tests {
    use super::*;
    use barloom_types::Bar;
    use chrono::{NaiveDate, TimeZone, Utc};
    use tempfile::TempDir;

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        )
        .unwrap()
    }

    fn sample_table() -> BarTable {
        let bars = (0..3)
            .map(|i| {
                let ts = Utc.with_ymd_and_hms(2024, 1, 2 + i, 0, 0, 0).unwrap();
                Bar::new(ts, 10.0, 11.0, 9.0, 10.5, 1000.0)
            })
            .collect();
        BarTable::from_bars(bars)
    }

    #[test]
    fn test_cache_creation() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("cache");
        let cache = BarCache::new(root.clone()).unwrap();
        assert!(root.exists());
        assert_eq!(cache.root(), root);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let cache = BarCache::new(temp_dir.path().to_path_buf()).unwrap();
        let table = sample_table();

        cache.save("AAPL", Interval::Day1, range(), &table).unwrap();
        let loaded = cache.load("AAPL", Interval::Day1, range()).unwrap();
        assert_eq!(loaded, Some(table));
    }

    #[test]
    fn test_absent_entry_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let cache = BarCache::new(temp_dir.path().to_path_buf()).unwrap();
        let loaded = cache.load("AAPL", Interval::Day1, range()).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_distinct_queries_distinct_entries() {
        let temp_dir = TempDir::new().unwrap();
        let cache = BarCache::new(temp_dir.path().to_path_buf()).unwrap();
        let table = sample_table();

        cache.save("AAPL", Interval::Day1, range(), &table).unwrap();
        assert!(cache.load("AAPL", Interval::Min5, range()).unwrap().is_none());
        assert!(cache.load("MSFT", Interval::Day1, range()).unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let cache = BarCache::new(temp_dir.path().to_path_buf()).unwrap();

        cache
            .save("AAPL", Interval::Day1, range(), &sample_table())
            .unwrap();
        cache
            .save("AAPL", Interval::Day1, range(), &BarTable::new())
            .unwrap();

        let loaded = cache.load("AAPL", Interval::Day1, range()).unwrap().unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_malformed_entry_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let cache = BarCache::new(temp_dir.path().to_path_buf()).unwrap();

        let path = cache.entry_path("AAPL", Interval::Day1, range());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"not parquet").unwrap();

        let result = cache.load("AAPL", Interval::Day1, range());
        assert!(matches!(result, Err(CacheError::Malformed { .. })));
    }
}
