//! Delta-ingest job: incrementally maintain per-symbol daily tables.

use crate::commands::split_symbols;
use crate::store;
use anyhow::{Context, Result};
use barloom_lib::prelude::*;
use chrono::{NaiveDate, TimeDelta, Utc};
use std::path::Path;

const DEFAULT_START: &str = "2015-01-01";

/// Overlap re-fetched on each run so late corrections from the
/// source replace previously stored bars.
const OVERLAP_DAYS: i64 = 5;

/// Fetches new daily bars for each symbol and merges them into the
/// per-symbol table under `data/raw_bars/interval=1d/`.
pub(crate) async fn delta_ingest(
    symbols: &str,
    start_str: Option<&str>,
    end_str: Option<&str>,
    rth_only: bool,
    data_dir: &Path,
    quiet: bool,
) -> Result<()> {
    let end = match end_str {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid end date: {s}"))?,
        None => Utc::now().date_naive(),
    };
    let initial_start = match start_str {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid start date: {s}"))?,
        None => NaiveDate::parse_from_str(DEFAULT_START, "%Y-%m-%d").expect("valid date"),
    };

    let fetcher = BarFetcher::from_env()?;

    for symbol in &split_symbols(symbols) {
        let table_path = store::symbol_bars_path(data_dir, symbol);
        let existing = if table_path.exists() {
            Some(store::load_bars(&table_path)?)
        } else {
            None
        };

        let start = existing
            .as_ref()
            .and_then(BarTable::last)
            .map_or(initial_start, |last| {
                last.timestamp.date_naive() - TimeDelta::days(OVERLAP_DAYS)
            });
        if start > end {
            tracing::debug!(symbol, "table already up to date");
            continue;
        }

        let range = DateRange::new(start, end)?;
        let fresh = fetcher
            .get_bars(symbol, range, Interval::Day1, rth_only)
            .await?;
        if fresh.is_empty() {
            tracing::warn!(symbol, "no data");
            continue;
        }

        // Fresh bars come after existing ones, so on duplicate
        // timestamps the corrected bar wins.
        let merged = match existing {
            Some(table) => {
                let mut bars = table.into_bars();
                bars.extend(fresh.bars().iter().copied());
                BarTable::from_bars(bars)
            }
            None => fresh,
        };
        store::save_bars(&table_path, &merged)?;
        if !quiet {
            println!("{symbol}: rows={} -> {}", merged.len(), table_path.display());
        }
    }
    Ok(())
}
