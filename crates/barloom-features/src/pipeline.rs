//! Per-symbol feature/label dataset assembly.

use barloom_types::BarTable;
use serde::{Deserialize, Serialize};

use crate::frame::{FeatureColumn, FeatureFrame, FrameError};
use crate::indicators::{pct_change, rolling_max, rolling_std, rsi};
use crate::labels::future_log_return;
use crate::scaler::StandardScaler;

/// Names of the engineered feature columns, in output order.
const FEATURE_COLS: [&str; 8] = [
    "ret1", "ret5", "ret20", "mom20", "vol20", "vol60", "rsi14", "dd20",
];

/// Metadata describing a built dataset.
///
/// Recorded alongside the artifacts so downstream training can
/// reconstruct the column order and undo the scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMeta {
    /// Feature column names, in order.
    pub feature_cols: Vec<String>,
    /// Label column names, one per horizon.
    pub target_cols: Vec<String>,
    /// Fitted per-column means.
    pub scaler_mean: Vec<f64>,
    /// Fitted per-column scales.
    pub scaler_scale: Vec<f64>,
}

/// Builds scaled features and forward-return labels for one symbol.
///
/// Features: 1/5/20-bar returns, 20-bar momentum, 20/60-bar rolling
/// volatility of 1-bar returns, RSI(14) and 20-bar drawdown. Labels:
/// one forward log return per requested horizon (in bars). Rows where
/// any feature or label is non-finite are dropped, then features are
/// standardized; the fitted scaler parameters are returned in the
/// metadata.
///
/// # Errors
///
/// Returns an error only on internal length mismatches.
pub fn build_dataset(
    table: &BarTable,
    symbol: &str,
    horizons: &[usize],
) -> Result<(FeatureFrame, FeatureFrame, FeatureMeta), FrameError> {
    let target_cols: Vec<String> = horizons.iter().map(|h| format!("y_{h}")).collect();
    let meta_empty = |cols: &[String]| FeatureMeta {
        feature_cols: FEATURE_COLS.iter().map(|s| s.to_string()).collect(),
        target_cols: cols.to_vec(),
        scaler_mean: Vec::new(),
        scaler_scale: Vec::new(),
    };

    if table.is_empty() {
        let feature_names: Vec<&str> = FEATURE_COLS.to_vec();
        let label_names: Vec<&str> = target_cols.iter().map(String::as_str).collect();
        return Ok((
            FeatureFrame::new(&feature_names),
            FeatureFrame::new(&label_names),
            meta_empty(&target_cols),
        ));
    }

    let closes = table.closes();
    let ret1 = pct_change(&closes, 1);
    let ret5 = pct_change(&closes, 5);
    let ret20 = pct_change(&closes, 20);
    let mom20 = pct_change(&closes, 20);
    let vol20 = rolling_std(&ret1, 20);
    let vol60 = rolling_std(&ret1, 60);
    let rsi14 = rsi(&closes, 14);
    let hi20 = rolling_max(&closes, 20);
    let dd20: Vec<f64> = closes
        .iter()
        .zip(&hi20)
        .map(|(c, h)| c / h - 1.0)
        .collect();

    let features: Vec<&[f64]> = vec![
        &ret1, &ret5, &ret20, &mom20, &vol20, &vol60, &rsi14, &dd20,
    ];
    let labels: Vec<Vec<f64>> = horizons
        .iter()
        .map(|&h| future_log_return(&closes, h))
        .collect();

    // Keep rows where every feature and every label has matured.
    let valid: Vec<usize> = (0..closes.len())
        .filter(|&i| {
            features.iter().all(|col| col[i].is_finite())
                && labels.iter().all(|col| col[i].is_finite())
        })
        .collect();

    let mut feature_cols: Vec<Vec<f64>> = features
        .iter()
        .map(|col| valid.iter().map(|&i| col[i]).collect())
        .collect();
    let scaler = StandardScaler::fit(&feature_cols);
    scaler.transform(&mut feature_cols);

    let timestamps = table.timestamps();
    let kept_ts: Vec<_> = valid.iter().map(|&i| timestamps[i]).collect();
    let kept_syms: Vec<String> = vec![symbol.to_string(); valid.len()];

    let feature_frame = FeatureFrame::from_parts(
        kept_ts.clone(),
        kept_syms.clone(),
        FEATURE_COLS
            .iter()
            .zip(feature_cols)
            .map(|(name, values)| FeatureColumn {
                name: name.to_string(),
                values,
            })
            .collect(),
    )?;

    let label_frame = FeatureFrame::from_parts(
        kept_ts,
        kept_syms,
        target_cols
            .iter()
            .zip(&labels)
            .map(|(name, col)| FeatureColumn {
                name: name.clone(),
                values: valid.iter().map(|&i| col[i]).collect(),
            })
            .collect(),
    )?;

    let meta = FeatureMeta {
        feature_cols: FEATURE_COLS.iter().map(|s| s.to_string()).collect(),
        target_cols,
        scaler_mean: scaler.mean().to_vec(),
        scaler_scale: scaler.scale().to_vec(),
    };

    Ok((feature_frame, label_frame, meta))
}

/// Single-horizon convenience wrapper around [`build_dataset`].
///
/// # Errors
///
/// Returns an error only on internal length mismatches.
pub fn engineer_basic_features(
    table: &BarTable,
    symbol: &str,
    horizon_bars: usize,
) -> Result<(FeatureFrame, FeatureFrame, FeatureMeta), FrameError> {
    build_dataset(table, symbol, &[horizon_bars])
}

#[cfg(test)]
mod tests {
    use super::*;
    use barloom_types::Bar;
    use chrono::{TimeDelta, TimeZone, Utc};

    fn synthetic_table(n: usize) -> BarTable {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let bars = (0..n)
            .map(|i| {
                // Gentle oscillation keeps every indicator finite.
                let close = 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1;
                Bar::new(
                    start + TimeDelta::days(i as i64),
                    close,
                    close + 1.0,
                    close - 1.0,
                    close,
                    1000.0,
                )
            })
            .collect();
        BarTable::from_bars(bars)
    }

    #[test]
    fn test_build_dataset_alignment() {
        let table = synthetic_table(120);
        let (features, labels, meta) = build_dataset(&table, "TEST", &[5]).unwrap();

        assert_eq!(features.len(), labels.len());
        assert_eq!(features.timestamps(), labels.timestamps());
        assert_eq!(meta.feature_cols.len(), 8);
        assert_eq!(meta.target_cols, vec!["y_5".to_string()]);
        // vol60 needs 60 returns, label needs 5 future bars.
        assert_eq!(features.len(), 120 - 60 - 5);
    }

    #[test]
    fn test_build_dataset_features_scaled() {
        let table = synthetic_table(120);
        let (features, _, meta) = build_dataset(&table, "TEST", &[5]).unwrap();

        let col = features.column("ret1").unwrap();
        let mean: f64 = col.iter().sum::<f64>() / col.len() as f64;
        assert!(mean.abs() < 1e-9);
        assert_eq!(meta.scaler_mean.len(), 8);
    }

    #[test]
    fn test_build_dataset_no_nans_survive() {
        let table = synthetic_table(120);
        let (features, labels, _) = build_dataset(&table, "TEST", &[5, 10]).unwrap();
        for col in features.columns() {
            assert!(col.values.iter().all(|v| v.is_finite()));
        }
        for col in labels.columns() {
            assert!(col.values.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_build_dataset_empty_table() {
        let (features, labels, meta) = build_dataset(&BarTable::new(), "TEST", &[5]).unwrap();
        assert!(features.is_empty());
        assert!(labels.is_empty());
        assert!(meta.scaler_mean.is_empty());
    }

    #[test]
    fn test_too_short_series_yields_empty() {
        let table = synthetic_table(10);
        let (features, _, _) = build_dataset(&table, "TEST", &[5]).unwrap();
        assert!(features.is_empty());
    }
}
