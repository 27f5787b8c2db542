//! Build-features command: one-shot dataset artifacts for training.

use crate::commands::{split_symbols, symbol_progress};
use crate::store;
use anyhow::{Context, Result};
use barloom_lib::prelude::*;
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

/// Fetches bars for each symbol, engineers features and labels, and
/// writes the stacked artifacts (features.parquet, labels.parquet,
/// meta.json) to the output directory.
pub(crate) async fn build_features(
    symbols: &str,
    start_str: &str,
    end_str: &str,
    interval_str: &str,
    horizons_str: &str,
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

    let horizons: Vec<usize> = horizons_str
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().with_context(|| format!("Invalid horizon: {s}")))
        .collect::<Result<_>>()?;
    anyhow::ensure!(!horizons.is_empty(), "No label horizons given");

    let fetcher = BarFetcher::from_env()?;
    let symbols = split_symbols(symbols);
    let progress = symbol_progress(symbols.len(), quiet);

    let mut all_features: Option<FeatureFrame> = None;
    let mut all_labels: Option<FeatureFrame> = None;
    let mut last_meta: Option<FeatureMeta> = None;

    for symbol in &symbols {
        progress.set_message(symbol.clone());
        let table = fetcher.get_bars(symbol, range, interval, rth_only).await?;
        let (features, labels, meta) = build_dataset(&table, symbol, &horizons)?;
        progress.inc(1);
        if features.is_empty() {
            tracing::warn!(symbol, "no usable rows");
            continue;
        }
        extend_into(&mut all_features, features)?;
        extend_into(&mut all_labels, labels)?;
        last_meta = Some(meta);
    }
    progress.finish_and_clear();

    let (Some(features), Some(labels), Some(meta)) = (all_features, all_labels, last_meta) else {
        tracing::warn!("no data produced");
        return Ok(());
    };

    store::save_frame(&out_dir.join("features.parquet"), &features)?;
    store::save_frame(&out_dir.join("labels.parquet"), &labels)?;

    let symbol_ids: std::collections::BTreeMap<&str, usize> = symbols
        .iter()
        .enumerate()
        .map(|(id, symbol)| (symbol.as_str(), id))
        .collect();
    let meta_doc = serde_json::json!({
        "symbols": symbols,
        "symbol_ids": symbol_ids,
        "interval": interval.as_str(),
        "horizons": horizons,
        "feature_cols": meta.feature_cols,
        "target_cols": meta.target_cols,
        "scaler_mean": meta.scaler_mean,
        "scaler_scale": meta.scaler_scale,
    });
    fs::write(
        out_dir.join("meta.json"),
        serde_json::to_string_pretty(&meta_doc)?,
    )?;

    if !quiet {
        println!(
            "wrote {} rows to {}",
            features.len(),
            out_dir.display()
        );
    }
    Ok(())
}

fn extend_into(acc: &mut Option<FeatureFrame>, frame: FeatureFrame) -> Result<()> {
    match acc {
        Some(existing) => existing.extend(&frame)?,
        None => *acc = Some(frame),
    }
    Ok(())
}
