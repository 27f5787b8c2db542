//! On-disk dataset layout helpers for the CLI.
//!
//! The jobs maintain a partitioned tree under a data directory:
//!
//! ```text
//! data/raw_bars/interval=1d/symbol=<SYM>/bars.parquet
//! data/features_daily/date=<YYYY-MM-DD>/part.parquet
//! data/labels_daily/date=<YYYY-MM-DD>/part.parquet
//! ```

use anyhow::{Context, Result};
use barloom_lib::{BarTable, FeatureFrame};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Directory of per-symbol daily bar tables.
pub(crate) fn raw_bars_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("raw_bars").join("interval=1d")
}

/// Path of one symbol's daily bar table.
pub(crate) fn symbol_bars_path(data_dir: &Path, symbol: &str) -> PathBuf {
    raw_bars_dir(data_dir)
        .join(format!("symbol={symbol}"))
        .join("bars.parquet")
}

/// Path of one date partition under a partitioned frame directory.
pub(crate) fn partition_path(base: &Path, date: NaiveDate) -> PathBuf {
    base.join(format!("date={date}")).join("part.parquet")
}

/// Lists (symbol, table path) pairs under the raw bars directory,
/// sorted by symbol.
pub(crate) fn list_symbol_tables(raw_base: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut tables = Vec::new();
    if !raw_base.exists() {
        return Ok(tables);
    }
    for entry in fs::read_dir(raw_base)
        .with_context(|| format!("Failed to read directory {}", raw_base.display()))?
    {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(symbol) = name.strip_prefix("symbol=") else {
            continue;
        };
        let table_path = entry.path().join("bars.parquet");
        if table_path.exists() {
            tables.push((symbol.to_string(), table_path));
        }
    }
    tables.sort();
    Ok(tables)
}

/// Lists the dates of `date=*` partitions under a directory, sorted.
pub(crate) fn list_partition_dates(base: &Path) -> Result<Vec<NaiveDate>> {
    let mut dates = Vec::new();
    if !base.exists() {
        return Ok(dates);
    }
    for entry in
        fs::read_dir(base).with_context(|| format!("Failed to read directory {}", base.display()))?
    {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(date_str) = name.strip_prefix("date=") else {
            continue;
        };
        if let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
            dates.push(date);
        }
    }
    dates.sort_unstable();
    Ok(dates)
}

/// Reads a bar table from a parquet file.
pub(crate) fn load_bars(path: &Path) -> Result<BarTable> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    barloom_lib::read_bars(file).with_context(|| format!("Failed to read {}", path.display()))
}

/// Writes a bar table as parquet, creating parent directories.
pub(crate) fn save_bars(path: &Path, table: &BarTable) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    barloom_lib::write_bars(table, file)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Reads a feature frame from a parquet file.
pub(crate) fn load_frame(path: &Path) -> Result<FeatureFrame> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    barloom_lib::read_frame(file).with_context(|| format!("Failed to read {}", path.display()))
}

/// Writes a feature frame as parquet, creating parent directories.
pub(crate) fn save_frame(path: &Path, frame: &FeatureFrame) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    barloom_lib::write_frame(frame, file)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Replaces one symbol's rows in a partition with `chunk`, keeping
/// every other symbol's rows.
pub(crate) fn merge_symbol_rows(path: &Path, symbol: &str, chunk: &FeatureFrame) -> Result<()> {
    let mut merged = if path.exists() {
        let mut existing = load_frame(path)?;
        let symbols = existing.symbols().to_vec();
        existing.retain(|i| symbols[i] != symbol);
        existing
    } else {
        FeatureFrame::new(&chunk.column_names())
    };
    merged.extend(chunk)?;
    merged.sort_by_timestamp();
    save_frame(path, &merged)
}

/// Splits a frame into per-date chunks, preserving row order.
pub(crate) fn split_by_date(frame: &FeatureFrame) -> Result<Vec<(NaiveDate, FeatureFrame)>> {
    let mut chunks: BTreeMap<NaiveDate, FeatureFrame> = BTreeMap::new();
    let names = frame.column_names();
    for i in 0..frame.len() {
        let timestamp = frame.timestamps()[i];
        let chunk = chunks
            .entry(timestamp.date_naive())
            .or_insert_with(|| FeatureFrame::new(&names));
        chunk.push_row(timestamp, &frame.symbols()[i], &frame.row(i))?;
    }
    Ok(chunks.into_iter().collect())
}
