//! Column-oriented feature tables.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors produced by frame construction and combination.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Column lengths do not match the row count.
    #[error("Column '{name}' has {len} values, expected {expected}")]
    LengthMismatch {
        /// The offending column.
        name: String,
        /// Its length.
        len: usize,
        /// The frame's row count.
        expected: usize,
    },

    /// Two frames with different column sets were combined.
    #[error("Column sets differ: expected {expected:?}, got {got:?}")]
    ColumnMismatch {
        /// Columns of the receiving frame.
        expected: Vec<String>,
        /// Columns of the other frame.
        got: Vec<String>,
    },

    /// A row was pushed with the wrong number of values.
    #[error("Row has {got} values, frame has {expected} columns")]
    RowWidth {
        /// Number of values supplied.
        got: usize,
        /// Number of columns in the frame.
        expected: usize,
    },
}

/// A named column of f64 values.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureColumn {
    /// Column name.
    pub name: String,
    /// Column values, one per row.
    pub values: Vec<f64>,
}

/// A column-oriented table of features or labels.
///
/// Every row carries a UTC timestamp and a symbol; data columns are
/// f64. This is the unit persisted to parquet for dataset artifacts
/// and date partitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureFrame {
    timestamps: Vec<DateTime<Utc>>,
    symbols: Vec<String>,
    columns: Vec<FeatureColumn>,
}

impl FeatureFrame {
    /// Creates an empty frame with the given column names.
    #[must_use]
    pub fn new(column_names: &[&str]) -> Self {
        Self {
            timestamps: Vec::new(),
            symbols: Vec::new(),
            columns: column_names
                .iter()
                .map(|name| FeatureColumn {
                    name: (*name).to_string(),
                    values: Vec::new(),
                })
                .collect(),
        }
    }

    /// Builds a frame from pre-assembled parts.
    ///
    /// # Errors
    ///
    /// Returns an error if any column length differs from the row count.
    pub fn from_parts(
        timestamps: Vec<DateTime<Utc>>,
        symbols: Vec<String>,
        columns: Vec<FeatureColumn>,
    ) -> Result<Self, FrameError> {
        let rows = timestamps.len();
        if symbols.len() != rows {
            return Err(FrameError::LengthMismatch {
                name: "symbol".to_string(),
                len: symbols.len(),
                expected: rows,
            });
        }
        for col in &columns {
            if col.values.len() != rows {
                return Err(FrameError::LengthMismatch {
                    name: col.name.clone(),
                    len: col.values.len(),
                    expected: rows,
                });
            }
        }
        Ok(Self {
            timestamps,
            symbols,
            columns,
        })
    }

    /// Returns the number of rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Returns true if the frame has no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Returns the row timestamps.
    #[must_use]
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Returns the row symbols.
    #[must_use]
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Returns the data columns.
    #[must_use]
    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    /// Returns the column names in order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Returns a column's values by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Returns one row's data values in column order.
    #[must_use]
    pub fn row(&self, index: usize) -> Vec<f64> {
        self.columns.iter().map(|c| c.values[index]).collect()
    }

    /// Appends a row.
    ///
    /// # Errors
    ///
    /// Returns an error if `values` does not match the column count.
    pub fn push_row(
        &mut self,
        timestamp: DateTime<Utc>,
        symbol: &str,
        values: &[f64],
    ) -> Result<(), FrameError> {
        if values.len() != self.columns.len() {
            return Err(FrameError::RowWidth {
                got: values.len(),
                expected: self.columns.len(),
            });
        }
        self.timestamps.push(timestamp);
        self.symbols.push(symbol.to_string());
        for (col, value) in self.columns.iter_mut().zip(values) {
            col.values.push(*value);
        }
        Ok(())
    }

    /// Keeps only the rows for which the predicate returns true.
    pub fn retain<F: FnMut(usize) -> bool>(&mut self, mut keep: F) {
        let kept: Vec<usize> = (0..self.len()).filter(|&i| keep(i)).collect();
        self.timestamps = kept.iter().map(|&i| self.timestamps[i]).collect();
        self.symbols = kept.iter().map(|&i| self.symbols[i].clone()).collect();
        for col in &mut self.columns {
            col.values = kept.iter().map(|&i| col.values[i]).collect();
        }
    }

    /// Appends all rows of another frame with the same column set.
    ///
    /// # Errors
    ///
    /// Returns an error if the column names differ.
    pub fn extend(&mut self, other: &Self) -> Result<(), FrameError> {
        if self.column_names() != other.column_names() {
            return Err(FrameError::ColumnMismatch {
                expected: self.column_names().iter().map(|s| s.to_string()).collect(),
                got: other.column_names().iter().map(|s| s.to_string()).collect(),
            });
        }
        self.timestamps.extend_from_slice(&other.timestamps);
        self.symbols.extend_from_slice(&other.symbols);
        for (col, other_col) in self.columns.iter_mut().zip(&other.columns) {
            col.values.extend_from_slice(&other_col.values);
        }
        Ok(())
    }

    /// Stably sorts rows by timestamp.
    pub fn sort_by_timestamp(&mut self) {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by_key(|&i| self.timestamps[i]);
        self.timestamps = order.iter().map(|&i| self.timestamps[i]).collect();
        self.symbols = order.iter().map(|&i| self.symbols[i].clone()).collect();
        for col in &mut self.columns {
            col.values = order.iter().map(|&i| col.values[i]).collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_push_and_access() {
        let mut frame = FeatureFrame::new(&["a", "b"]);
        frame.push_row(ts(10), "AAPL", &[1.0, 2.0]).unwrap();
        frame.push_row(ts(11), "AAPL", &[3.0, 4.0]).unwrap();

        assert_eq!(frame.len(), 2);
        assert_eq!(frame.column("a"), Some(&[1.0, 3.0][..]));
        assert_eq!(frame.row(1), vec![3.0, 4.0]);
    }

    #[test]
    fn test_push_row_width_checked() {
        let mut frame = FeatureFrame::new(&["a", "b"]);
        assert!(frame.push_row(ts(10), "AAPL", &[1.0]).is_err());
    }

    #[test]
    fn test_retain() {
        let mut frame = FeatureFrame::new(&["a"]);
        frame.push_row(ts(10), "AAPL", &[1.0]).unwrap();
        frame.push_row(ts(11), "MSFT", &[2.0]).unwrap();
        frame.push_row(ts(12), "AAPL", &[3.0]).unwrap();

        let symbols: Vec<String> = frame.symbols().to_vec();
        frame.retain(|i| symbols[i] != "AAPL");
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.symbols(), &["MSFT".to_string()][..]);
    }

    #[test]
    fn test_extend_checks_columns() {
        let mut a = FeatureFrame::new(&["a"]);
        let b = FeatureFrame::new(&["b"]);
        assert!(a.extend(&b).is_err());
    }

    #[test]
    fn test_sort_by_timestamp() {
        let mut frame = FeatureFrame::new(&["a"]);
        frame.push_row(ts(12), "X", &[3.0]).unwrap();
        frame.push_row(ts(10), "X", &[1.0]).unwrap();
        frame.push_row(ts(11), "X", &[2.0]).unwrap();
        frame.sort_by_timestamp();
        assert_eq!(frame.column("a"), Some(&[1.0, 2.0, 3.0][..]));
    }

    #[test]
    fn test_from_parts_length_checked() {
        let result = FeatureFrame::from_parts(
            vec![ts(10)],
            vec!["X".to_string()],
            vec![FeatureColumn {
                name: "a".to_string(),
                values: vec![1.0, 2.0],
            }],
        );
        assert!(result.is_err());
    }
}
