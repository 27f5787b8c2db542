//! Build-panel job: month-end cross-sectional panel for ranking models.

use crate::store;
use anyhow::Result;
use barloom_lib::FeatureFrame;
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Joins month-end feature partitions with matured labels into one
/// panel (panel.parquet) plus per-date group sizes (groups.json) for
/// listwise ranking trainers.
pub(crate) fn build_panel(data_dir: &Path, out_dir: &Path, quiet: bool) -> Result<()> {
    let feat_base = data_dir.join("features_daily");
    let lab_base = data_dir.join("labels_daily");

    let dates = month_end_dates(&store::list_partition_dates(&feat_base)?);
    if dates.is_empty() {
        tracing::warn!("no feature partitions found");
        return Ok(());
    }

    let mut panel: Option<FeatureFrame> = None;
    let mut groups: Vec<usize> = Vec::new();

    for date in dates {
        let feat_path = store::partition_path(&feat_base, date);
        let lab_path = store::partition_path(&lab_base, date);
        if !feat_path.exists() || !lab_path.exists() {
            continue;
        }

        let features = store::load_frame(&feat_path)?;
        let labels = store::load_frame(&lab_path)?;
        let joined = join_on_symbol(&features, &labels)?;
        if joined.is_empty() {
            continue;
        }

        groups.push(joined.len());
        match &mut panel {
            Some(existing) => existing.extend(&joined)?,
            None => panel = Some(joined),
        }
    }

    let Some(panel) = panel else {
        tracing::warn!("no overlapping feature and label partitions");
        return Ok(());
    };

    store::save_frame(&out_dir.join("panel.parquet"), &panel)?;
    fs::write(out_dir.join("groups.json"), serde_json::to_string(&groups)?)?;
    if !quiet {
        println!(
            "panel rows={} dates={} -> {}",
            panel.len(),
            groups.len(),
            out_dir.display()
        );
    }
    Ok(())
}

/// Keeps the last available date of each calendar month.
fn month_end_dates(dates: &[NaiveDate]) -> Vec<NaiveDate> {
    let mut by_month: BTreeMap<(i32, u32), NaiveDate> = BTreeMap::new();
    for &date in dates {
        let entry = by_month.entry((date.year(), date.month())).or_insert(date);
        if date > *entry {
            *entry = date;
        }
    }
    by_month.into_values().collect()
}

/// Inner-joins a feature partition with a label partition on symbol,
/// appending the label as a trailing `y` column.
fn join_on_symbol(features: &FeatureFrame, labels: &FeatureFrame) -> Result<FeatureFrame> {
    let y_values = labels.column("y").unwrap_or(&[]);
    let label_by_symbol: HashMap<&str, f64> = labels
        .symbols()
        .iter()
        .zip(y_values)
        .map(|(symbol, &y)| (symbol.as_str(), y))
        .collect();

    let mut names = features.column_names();
    names.push("y");
    let mut joined = FeatureFrame::new(&names);
    for i in 0..features.len() {
        let symbol = &features.symbols()[i];
        if let Some(&y) = label_by_symbol.get(symbol.as_str()) {
            let mut row = features.row(i);
            row.push(y);
            joined.push_row(features.timestamps()[i], symbol, &row)?;
        }
    }
    Ok(joined)
}
