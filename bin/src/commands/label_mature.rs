//! Label-maturer job: emit forward-return labels once matured.

use crate::store;
use anyhow::Result;
use barloom_lib::{FeatureFrame, future_log_return};
use std::path::Path;

/// Computes forward log-return labels for every symbol table under
/// `raw_bars` and merges them into `data/labels_daily/date=*/`
/// partitions. A label only appears once its horizon has matured:
/// the tail of the series, whose forward return is still unknown,
/// is skipped.
pub(crate) fn label_mature(horizon: usize, data_dir: &Path, quiet: bool) -> Result<()> {
    let raw_base = store::raw_bars_dir(data_dir);
    let out_base = data_dir.join("labels_daily");

    for (symbol, table_path) in store::list_symbol_tables(&raw_base)? {
        let table = store::load_bars(&table_path)?;
        let labels = future_log_return(&table.closes(), horizon);

        let mut frame = FeatureFrame::new(&["y"]);
        for (bar, &y) in table.bars().iter().zip(&labels) {
            if y.is_finite() {
                frame.push_row(bar.timestamp, &symbol, &[y])?;
            }
        }
        if frame.is_empty() {
            tracing::warn!(symbol, "no matured labels");
            continue;
        }
        for (date, chunk) in store::split_by_date(&frame)? {
            store::merge_symbol_rows(&store::partition_path(&out_base, date), &symbol, &chunk)?;
        }
        if !quiet {
            println!("{symbol}: labels rows={}", frame.len());
        }
    }
    Ok(())
}
