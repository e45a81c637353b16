//! Realignment of zero-padded signal columns.
//!
//! Every column of a [`Table`] is shifted by a whole number of rows so that
//! its feature (the row of its peak value, or the midpoint of its non-zero
//! support) lands on the same row as the feature of the reference column.
//! The reference column is the one with the fewest zero entries.

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::table::{Table, TableError};

/// Errors that can occur during realignment.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AlignError {
    #[error("Invalid input table: {0}")]
    InvalidInput(String),

    #[error("Column {column} ('{label}') has no non-zero values")]
    AllZeroColumn { column: usize, label: String },

    #[error("Non-finite value at row {row} of column {column}")]
    NonFinite { column: usize, row: usize },

    #[error("Invalid alignment mode '{0}', expected 'max' or 'center'")]
    InvalidArgument(String),

    #[error(
        "Alignment invariant violated for column {column}: expected feature at row {expected}, found {actual:?}"
    )]
    InvariantViolation {
        column: usize,
        expected: usize,
        actual: Option<usize>,
    },

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Result type for realignment operations.
pub type Result<T> = std::result::Result<T, AlignError>;

/// Feature each column is aligned on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignMode {
    /// Row of the column's maximum value
    #[default]
    Max,
    /// Midpoint of the column's non-zero support
    Center,
}

impl AlignMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlignMode::Max => "max",
            AlignMode::Center => "center",
        }
    }
}

impl fmt::Display for AlignMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlignMode {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "max" => Ok(AlignMode::Max),
            "center" => Ok(AlignMode::Center),
            _ => Err(AlignError::InvalidArgument(s.to_string())),
        }
    }
}

/// Output of [`realign_data`].
#[derive(Debug, Clone, PartialEq)]
pub struct Realignment {
    /// Aligned table, same shape and labels as the input.
    pub table: Table,
    /// Row shift applied to each column, in input column order.
    pub shifts: Vec<isize>,
    /// Index of the column everything was aligned to.
    pub reference_column: usize,
    /// Row the features of all columns now sit on.
    pub reference_feature: usize,
}

impl Realignment {
    /// Split into the `(aligned_table, shifts)` pair.
    pub fn into_parts(self) -> (Table, Vec<isize>) {
        (self.table, self.shifts)
    }
}

/// Middle position of a sequence: `ceil(len / 2)`.
///
/// Only the length of `indices` is used. An empty sequence yields 0.
///
/// # Example
///
/// ```
/// use signal_realign::processors::alignment::find_middle;
///
/// let indices: Vec<usize> = (0..11).collect();
/// assert_eq!(find_middle(&indices), 6);
/// assert_eq!(find_middle(&indices[..6]), 3);
/// ```
#[inline]
pub fn find_middle<T>(indices: &[T]) -> usize {
    (indices.len() + 1) / 2
}

/// Row indices holding non-zero values.
pub fn nonzero_indices(values: &[f64]) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v != 0.0)
        .map(|(i, _)| i)
        .collect()
}

/// Row of the maximum value. Ties go to the first row; `None` if empty.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Index of the column with the fewest zero entries.
///
/// Scans left to right and keeps the first column reaching the minimum, so
/// ties go to the earliest column. `None` for a table without columns.
pub fn reference_column(table: &Table) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (index, values) in table.columns().iter().enumerate() {
        let zeros = values.iter().filter(|&&v| v == 0.0).count();
        match best {
            Some((_, fewest)) if zeros >= fewest => {}
            _ => best = Some((index, zeros)),
        }
    }
    best.map(|(index, _)| index)
}

/// Feature row of a column under the given mode.
pub fn column_feature(values: &[f64], mode: AlignMode) -> Option<usize> {
    match mode {
        AlignMode::Max => argmax(values),
        AlignMode::Center => {
            let support = nonzero_indices(values);
            if support.is_empty() {
                None
            } else {
                Some(find_middle(&support))
            }
        }
    }
}

/// Shift a column by `shift` rows, filling vacated rows with zero.
///
/// Positive shifts move values toward higher rows, negative toward lower.
/// A shift of at least the column length yields an all-zero column.
pub fn shift_column(values: &[f64], shift: isize) -> Vec<f64> {
    let n = values.len();
    let mut shifted = vec![0.0; n];
    let magnitude = shift.unsigned_abs();

    if magnitude >= n {
        return shifted;
    }

    if shift >= 0 {
        shifted[magnitude..].copy_from_slice(&values[..n - magnitude]);
    } else {
        shifted[..n - magnitude].copy_from_slice(&values[magnitude..]);
    }

    shifted
}

/// Check the preconditions of [`realign_data`].
fn validate(table: &Table) -> Result<()> {
    if table.n_cols() == 0 {
        return Err(AlignError::InvalidInput("table has no columns".to_string()));
    }
    if table.n_rows() == 0 {
        return Err(AlignError::InvalidInput("table has no rows".to_string()));
    }

    for (column, values) in table.columns().iter().enumerate() {
        if let Some(row) = values.iter().position(|v| !v.is_finite()) {
            return Err(AlignError::NonFinite { column, row });
        }
        if values.iter().all(|&v| v == 0.0) {
            return Err(AlignError::AllZeroColumn {
                column,
                label: table.labels()[column].clone(),
            });
        }
    }

    Ok(())
}

/// Realign every column of `table` onto the reference column.
///
/// In [`AlignMode::Max`] the feature is the row of the column's maximum; in
/// [`AlignMode::Center`] it is [`find_middle`] of the column's non-zero rows.
/// Each column is shifted by `reference_feature - feature(column)`.
///
/// After shifting, the row of each column's maximum must equal the reference
/// feature (in center mode this serves as a proxy check). Any mismatch aborts
/// the call with [`AlignError::InvariantViolation`]; no partial result is
/// returned.
///
/// # Errors
///
/// Returns an error if:
/// - The table has no columns or no rows
/// - A value is NaN or infinite
/// - A column is entirely zero
/// - A shifted column fails the post-condition check
///
/// # Example
///
/// ```
/// use signal_realign::core::table::Table;
/// use signal_realign::processors::alignment::{realign_data, AlignMode};
///
/// let table = Table::from_unlabelled_series(vec![
///     vec![1.0, 1.0, 1.0, 2.0, 3.0, 4.0, 5.0, 4.0, 4.0, 3.0, 2.0],
///     vec![1.0, 4.0, 5.0, 6.0, 7.0, 6.0, 4.0],
/// ])
/// .unwrap();
///
/// let (aligned, shifts) = realign_data(&table, AlignMode::Max).unwrap().into_parts();
/// assert_eq!(shifts, vec![0, 2]);
/// assert_eq!(aligned.n_rows(), 11);
/// ```
pub fn realign_data(table: &Table, mode: AlignMode) -> Result<Realignment> {
    validate(table)?;

    let reference = reference_column(table)
        .ok_or_else(|| AlignError::InvalidInput("table has no columns".to_string()))?;
    let reference_values = &table.columns()[reference];
    let reference_feature = column_feature(reference_values, mode).ok_or_else(|| {
        AlignError::AllZeroColumn {
            column: reference,
            label: table.labels()[reference].clone(),
        }
    })?;

    debug!(
        "Reference column {} ('{}'), {} feature at row {}",
        reference,
        table.labels()[reference],
        mode,
        reference_feature
    );

    let mut columns = Vec::with_capacity(table.n_cols());
    let mut shifts = Vec::with_capacity(table.n_cols());

    for (column, values) in table.columns().iter().enumerate() {
        let feature = column_feature(values, mode).ok_or_else(|| AlignError::AllZeroColumn {
            column,
            label: table.labels()[column].clone(),
        })?;

        let shift = reference_feature as isize - feature as isize;
        let shifted = shift_column(values, shift);

        let actual = if shifted.iter().any(|&v| v != 0.0) {
            argmax(&shifted)
        } else {
            None
        };
        if actual != Some(reference_feature) {
            return Err(AlignError::InvariantViolation {
                column,
                expected: reference_feature,
                actual,
            });
        }

        debug!("Column {} feature row {} shifted by {}", column, feature, shift);

        columns.push(shifted);
        shifts.push(shift);
    }

    let table = Table::new(table.labels().to_vec(), columns)?;

    Ok(Realignment {
        table,
        shifts,
        reference_column: reference,
        reference_feature,
    })
}
