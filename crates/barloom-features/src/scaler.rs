//! Per-column standardization.

/// Standardizes columns to zero mean and unit variance.
///
/// The fitted mean and scale are recorded in dataset metadata so that
/// inference-time inputs can be transformed identically. Uses the
/// population standard deviation; zero-variance columns get a scale of
/// 1 so they map to all-zero rather than NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Fits a scaler to the given columns.
    #[must_use]
    pub fn fit(columns: &[Vec<f64>]) -> Self {
        let mut mean = Vec::with_capacity(columns.len());
        let mut scale = Vec::with_capacity(columns.len());
        for col in columns {
            let n = col.len().max(1) as f64;
            let m = col.iter().sum::<f64>() / n;
            let var = col.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n;
            let s = var.sqrt();
            mean.push(m);
            scale.push(if s > 0.0 { s } else { 1.0 });
        }
        Self { mean, scale }
    }

    /// Transforms columns in place.
    pub fn transform(&self, columns: &mut [Vec<f64>]) {
        for (j, col) in columns.iter_mut().enumerate() {
            for v in col.iter_mut() {
                *v = (*v - self.mean[j]) / self.scale[j];
            }
        }
    }

    /// Returns the fitted per-column means.
    #[must_use]
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Returns the fitted per-column scales.
    #[must_use]
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fit_transform_centers_and_scales() {
        let mut cols = vec![vec![1.0, 2.0, 3.0]];
        let scaler = StandardScaler::fit(&cols);
        scaler.transform(&mut cols);

        let mean: f64 = cols[0].iter().sum::<f64>() / 3.0;
        assert_relative_eq!(mean, 0.0, epsilon = 1e-12);
        let var: f64 = cols[0].iter().map(|v| v * v).sum::<f64>() / 3.0;
        assert_relative_eq!(var, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_variance_column() {
        let mut cols = vec![vec![7.0, 7.0, 7.0]];
        let scaler = StandardScaler::fit(&cols);
        scaler.transform(&mut cols);
        assert!(cols[0].iter().all(|v| v.abs() < 1e-12));
    }
}
