//! Technical indicators over close-price series.
//!
//! All functions return a vector aligned with the input, with NaN in
//! positions where the indicator is not yet defined.

/// Fractional change over `periods` bars: `p[i] / p[i - periods] - 1`.
#[must_use]
pub fn pct_change(values: &[f64], periods: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    for i in periods..values.len() {
        out[i] = values[i] / values[i - periods] - 1.0;
    }
    out
}

/// Rolling sample standard deviation (ddof = 1) over `window` values.
#[must_use]
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window < 2 {
        return out;
    }
    for i in (window - 1)..values.len() {
        let slice = &values[i + 1 - window..=i];
        let mean = slice.iter().sum::<f64>() / window as f64;
        let var = slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (window - 1) as f64;
        out[i] = var.sqrt();
    }
    out
}

/// Rolling maximum over `window` values.
#[must_use]
pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    for i in (window - 1)..values.len() {
        out[i] = values[i + 1 - window..=i]
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
    }
    out
}

/// Relative Strength Index with Wilder exponential smoothing.
///
/// Average gains and losses are smoothed with alpha = 1/period starting
/// from the first price change; the ratio is stabilized with a small
/// epsilon so an all-gain series approaches 100 and an all-loss series
/// approaches 0.
#[must_use]
pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    let mut out = vec![f64::NAN; n];
    if n < 2 || period == 0 {
        return out;
    }

    let alpha = 1.0 / period as f64;
    let mut avg_up = f64::NAN;
    let mut avg_down = f64::NAN;

    for i in 1..n {
        let delta = closes[i] - closes[i - 1];
        let up = delta.max(0.0);
        let down = (-delta).max(0.0);

        if avg_up.is_nan() {
            avg_up = up;
            avg_down = down;
        } else {
            avg_up = alpha * up + (1.0 - alpha) * avg_up;
            avg_down = alpha * down + (1.0 - alpha) * avg_down;
        }

        let rs = avg_up / (avg_down + 1e-12);
        out[i] = 100.0 - 100.0 / (1.0 + rs);
    }
    out
}
