//! Forward-return labels.

/// Log-return `horizon_bars` into the future: `ln(p[i+h] / p[i])`.
///
/// Assumes regular sampling. The last `horizon_bars` positions have no
/// matured future price and are NaN.
#[must_use]
pub fn future_log_return(closes: &[f64], horizon_bars: usize) -> Vec<f64> {
    let n = closes.len();
    let mut out = vec![f64::NAN; n];
    if horizon_bars == 0 || horizon_bars >= n {
        return out;
    }
    for i in 0..n - horizon_bars {
        out[i] = (closes[i + horizon_bars] / closes[i]).ln();
    }
    out
}
