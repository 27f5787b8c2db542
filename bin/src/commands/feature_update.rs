//! Feature-update job: refresh the date-partitioned feature store.

use crate::store;
use anyhow::Result;
use barloom_lib::engineer_basic_features;
use std::path::Path;

/// Rebuilds features for every symbol table under `raw_bars` and
/// merges them into `data/features_daily/date=*/part.parquet`
/// partitions, replacing each symbol's previous rows.
pub(crate) fn feature_update(horizon: usize, data_dir: &Path, quiet: bool) -> Result<()> {
    let raw_base = store::raw_bars_dir(data_dir);
    let out_base = data_dir.join("features_daily");

    for (symbol, table_path) in store::list_symbol_tables(&raw_base)? {
        let table = store::load_bars(&table_path)?;
        let (features, _, _) = engineer_basic_features(&table, &symbol, horizon)?;
        if features.is_empty() {
            tracing::warn!(symbol, "no usable rows");
            continue;
        }
        for (date, chunk) in store::split_by_date(&features)? {
            store::merge_symbol_rows(&store::partition_path(&out_base, date), &symbol, &chunk)?;
        }
        if !quiet {
            println!("{symbol}: features rows={}", features.len());
        }
    }
    Ok(())
}
