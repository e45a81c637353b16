//! Data writers for aligned tables and shift vectors.
//!
//! Both writers emit plain CSV with a header row and create any missing
//! parent directories of the output path.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use thiserror::Error;

use super::table::Table;

/// Errors that can occur during write operations.
#[derive(Error, Debug)]
pub enum WriteError {
    /// Failed to create parent directories.
    #[error("failed to create parent directories for '{path}': {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or open file for writing.
    #[error("failed to create file '{path}': {source}")]
    CreateFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to flush data to file.
    #[error("failed to write to file '{path}': {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV writing error.
    #[error("CSV write error for '{path}': {source}")]
    CsvError {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// Mismatched array lengths.
    #[error("length mismatch: {labels_len} labels but {shifts_len} shifts")]
    LengthMismatch { labels_len: usize, shifts_len: usize },
}

/// Result type for write operations.
pub type Result<T> = std::result::Result<T, WriteError>;

/// Creates parent directories for a file path if they don't exist.
fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| WriteError::CreateDirectory {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
    }
    Ok(())
}

fn create_csv_writer(path: &Path) -> Result<csv::Writer<BufWriter<File>>> {
    ensure_parent_dirs(path)?;
    let file = File::create(path).map_err(|e| WriteError::CreateFile {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(csv::Writer::from_writer(BufWriter::new(file)))
}

/// Write a table to CSV: one header row of labels, then one row per sample.
///
/// Values are written with their shortest round-trip representation.
///
/// # Example
///
/// ```no_run
/// use signal_realign::core::table::Table;
/// use signal_realign::core::writers::write_table_csv;
/// use std::path::Path;
///
/// let table = Table::from_columns(vec![vec![1.0, 2.0]]).unwrap();
/// write_table_csv(Path::new("aligned.csv"), &table).unwrap();
/// ```
pub fn write_table_csv(path: &Path, table: &Table) -> Result<()> {
    let mut csv_writer = create_csv_writer(path)?;
    let path_str = path.display().to_string();

    csv_writer
        .write_record(table.labels())
        .map_err(|e| WriteError::CsvError {
            path: path_str.clone(),
            source: e,
        })?;

    for row in table.rows() {
        csv_writer
            .write_record(row.iter().map(|v| v.to_string()))
            .map_err(|e| WriteError::CsvError {
                path: path_str.clone(),
                source: e,
            })?;
    }

    csv_writer.flush().map_err(|e| WriteError::WriteFile {
        path: path_str,
        source: e,
    })?;

    Ok(())
}

/// Write per-column shifts to CSV with headers "column,shift".
///
/// # Errors
///
/// Returns an error if `labels` and `shifts` differ in length, or the file
/// cannot be created or written to.
pub fn write_shifts_csv(path: &Path, labels: &[String], shifts: &[isize]) -> Result<()> {
    if labels.len() != shifts.len() {
        return Err(WriteError::LengthMismatch {
            labels_len: labels.len(),
            shifts_len: shifts.len(),
        });
    }

    let mut csv_writer = create_csv_writer(path)?;
    let path_str = path.display().to_string();

    csv_writer
        .write_record(["column", "shift"])
        .map_err(|e| WriteError::CsvError {
            path: path_str.clone(),
            source: e,
        })?;

    for (label, shift) in labels.iter().zip(shifts.iter()) {
        csv_writer
            .write_record([label.clone(), shift.to_string()])
            .map_err(|e| WriteError::CsvError {
                path: path_str.clone(),
                source: e,
            })?;
    }

    csv_writer.flush().map_err(|e| WriteError::WriteFile {
        path: path_str,
        source: e,
    })?;

    Ok(())
}
