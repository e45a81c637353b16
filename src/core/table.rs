//! Column-major numeric table with zero used as the pad sentinel.

use thiserror::Error;

/// Errors raised when a table cannot be built from the given columns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("column {column} has {found} rows, expected {expected}")]
    NonRectangular {
        column: usize,
        expected: usize,
        found: usize,
    },

    #[error("{labels} labels given for {columns} columns")]
    LabelMismatch { labels: usize, columns: usize },
}

/// Rectangular grid of samples: rows are sample positions, columns are
/// independent series padded with zeros to a common length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    labels: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl Table {
    /// Build a table from labelled columns of equal length.
    pub fn new(labels: Vec<String>, columns: Vec<Vec<f64>>) -> Result<Self, TableError> {
        if labels.len() != columns.len() {
            return Err(TableError::LabelMismatch {
                labels: labels.len(),
                columns: columns.len(),
            });
        }

        if let Some(first) = columns.first() {
            let expected = first.len();
            for (column, values) in columns.iter().enumerate() {
                if values.len() != expected {
                    return Err(TableError::NonRectangular {
                        column,
                        expected,
                        found: values.len(),
                    });
                }
            }
        }

        Ok(Self { labels, columns })
    }

    /// Build a table from equal-length columns labelled `"0"`, `"1"`, ...
    pub fn from_columns(columns: Vec<Vec<f64>>) -> Result<Self, TableError> {
        let labels = default_labels(columns.len());
        Self::new(labels, columns)
    }

    /// Build a table from series of any length, zero-padding each one at the
    /// end to the length of the longest.
    pub fn from_series(labels: Vec<String>, series: Vec<Vec<f64>>) -> Result<Self, TableError> {
        let n_rows = series.iter().map(Vec::len).max().unwrap_or(0);
        let columns = series
            .into_iter()
            .map(|mut values| {
                values.resize(n_rows, 0.0);
                values
            })
            .collect();
        Self::new(labels, columns)
    }

    /// Like [`Table::from_series`] with default labels.
    pub fn from_unlabelled_series(series: Vec<Vec<f64>>) -> Result<Self, TableError> {
        let labels = default_labels(series.len());
        Self::from_series(labels, series)
    }

    /// Number of rows (samples per column).
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    /// Number of columns.
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the table has no columns or no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_cols() == 0 || self.n_rows() == 0
    }

    #[inline]
    pub fn column(&self, index: usize) -> Option<&[f64]> {
        self.columns.get(index).map(Vec::as_slice)
    }

    #[inline]
    pub fn columns(&self) -> &[Vec<f64>] {
        &self.columns
    }

    #[inline]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Value at (row, column), if in range.
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.columns.get(column).and_then(|c| c.get(row)).copied()
    }

    /// Iterate over rows as freshly collected vectors, in row order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<f64>> + '_ {
        (0..self.n_rows()).map(move |row| self.columns.iter().map(|c| c[row]).collect())
    }
}

fn default_labels(n: usize) -> Vec<String> {
    (0..n).map(|i| i.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_series_pads_with_zero() {
        let table =
            Table::from_unlabelled_series(vec![vec![1.0, 2.0, 3.0], vec![4.0]]).unwrap();

        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.n_cols(), 2);
        assert_eq!(table.column(1), Some(&[4.0, 0.0, 0.0][..]));
        assert_eq!(table.labels(), &["0".to_string(), "1".to_string()]);
    }

    #[test]
    fn test_new_rejects_ragged_columns() {
        let err = Table::from_columns(vec![vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert_eq!(
            err,
            TableError::NonRectangular {
                column: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_new_rejects_label_mismatch() {
        let err = Table::new(vec!["a".into()], vec![vec![1.0], vec![2.0]]).unwrap_err();
        assert_eq!(err, TableError::LabelMismatch { labels: 1, columns: 2 });
    }

    #[test]
    fn test_rows_and_get() {
        let table = Table::from_columns(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let rows: Vec<Vec<f64>> = table.rows().collect();

        assert_eq!(rows, vec![vec![1.0, 3.0], vec![2.0, 4.0]]);
        assert_eq!(table.get(1, 0), Some(2.0));
        assert_eq!(table.get(2, 0), None);
    }

    #[test]
    fn test_empty_table() {
        let table = Table::from_columns(Vec::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.n_rows(), 0);
    }
}
