//! Fetch command: download bars and write them under data/raw.

use crate::commands::{split_symbols, symbol_progress};
use crate::store;
use anyhow::{Context, Result};
use barloom_lib::prelude::*;
use chrono::NaiveDate;
use std::path::Path;

/// Fetches bars for each symbol and writes one parquet file per
/// symbol to the output directory.
pub(crate) async fn fetch(
    symbols: &str,
    start_str: &str,
    end_str: &str,
    interval_str: &str,
    rth_only: bool,
    out_dir: &Path,
    quiet: bool,
) -> Result<()> {
    let interval: Interval = interval_str.parse()?;
    let start = NaiveDate::parse_from_str(start_str, "%Y-%m-%d")
        .with_context(|| format!("Invalid start date: {start_str}"))?;
    let end = NaiveDate::parse_from_str(end_str, "%Y-%m-%d")
        .with_context(|| format!("Invalid end date: {end_str}"))?;
    let range = DateRange::new(start, end)?;

    let fetcher = BarFetcher::from_env()?;
    let symbols = split_symbols(symbols);
    let progress = symbol_progress(symbols.len(), quiet);

    for symbol in &symbols {
        progress.set_message(symbol.clone());
        let table = fetcher.get_bars(symbol, range, interval, rth_only).await?;
        if table.is_empty() {
            tracing::warn!(symbol, "no data");
            progress.inc(1);
            continue;
        }
        let out = out_dir.join(format!("{symbol}_{interval}_{start}_{end}.parquet"));
        store::save_bars(&out, &table)?;
        if !quiet {
            println!("wrote {} rows={}", out.display(), table.len());
        }
        progress.inc(1);
    }
    progress.finish_and_clear();
    Ok(())
}
