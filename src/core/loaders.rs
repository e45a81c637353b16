//! Data loaders for numeric signal CSV files.
//!
//! This module provides parsers for:
//! - Whole CSV tables, one column per series, short rows zero-padded
//! - A single series taken from one column of a CSV
//! - One series per file combined into a zero-padded [`Table`]

use std::convert::Infallible;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use csv::{Reader, ReaderBuilder};
use log::debug;
use thiserror::Error;

use super::table::{Table, TableError};

/// Errors that can occur during file loading.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Empty file: {0}")]
    EmptyFile(PathBuf),

    #[error("Missing required columns: {0}")]
    MissingColumns(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("No input files given")]
    NoInputs,

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Selects one column of a CSV, by position or by header name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    Index(usize),
    Name(String),
}

impl Default for ColumnSelector {
    fn default() -> Self {
        ColumnSelector::Index(0)
    }
}

impl FromStr for ColumnSelector {
    type Err = Infallible;

    /// All-digit strings select by index, anything else by header name.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<usize>() {
            Ok(index) => ColumnSelector::Index(index),
            Err(_) => ColumnSelector::Name(s.to_string()),
        })
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSelector::Index(index) => write!(f, "{}", index),
            ColumnSelector::Name(name) => f.write_str(name),
        }
    }
}

fn open_reader(path: &Path, has_headers: bool) -> Result<Reader<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file)))
}

/// Parse one cell. Empty cells are padding and read as zero.
fn parse_cell(field: &str, row: usize, column: usize) -> Result<f64> {
    if field.is_empty() {
        return Ok(0.0);
    }
    field.parse::<f64>().map_err(|_| {
        LoaderError::ParseError(format!(
            "row {} column {}: '{}' is not a number",
            row, column, field
        ))
    })
}

/// Load a numeric CSV into a [`Table`].
///
/// With `has_headers`, header names become column labels; otherwise columns
/// are labelled by position. Rows shorter than the widest row, and empty
/// cells, are padded with zero.
///
/// # Arguments
///
/// * `path` - Path to the CSV file
/// * `has_headers` - Whether the first row holds column names
///
/// # Errors
///
/// Returns an error if the file cannot be read, holds no data rows, or a
/// cell is not numeric.
pub fn load_table_csv<P: AsRef<Path>>(path: P, has_headers: bool) -> Result<Table> {
    let path = path.as_ref();
    let mut reader = open_reader(path, has_headers)?;

    let headers: Vec<String> = if has_headers {
        reader.headers()?.iter().map(str::to_string).collect()
    } else {
        Vec::new()
    };

    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(1024);
    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        let mut row = Vec::with_capacity(record.len());
        for (col_idx, field) in record.iter().enumerate() {
            row.push(parse_cell(field, row_idx, col_idx)?);
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(LoaderError::EmptyFile(path.to_path_buf()));
    }

    let widest = rows.iter().map(Vec::len).max().unwrap_or(0);
    let n_cols = widest.max(headers.len());

    let columns: Vec<Vec<f64>> = (0..n_cols)
        .map(|c| {
            rows.iter()
                .map(|row| row.get(c).copied().unwrap_or(0.0))
                .collect()
        })
        .collect();

    let labels: Vec<String> = (0..n_cols)
        .map(|c| match headers.get(c) {
            Some(name) if !name.is_empty() => name.clone(),
            _ => c.to_string(),
        })
        .collect();

    debug!(
        "Loaded {} rows x {} columns from {}",
        rows.len(),
        n_cols,
        path.display()
    );

    Ok(Table::new(labels, columns)?)
}

/// Load one column of a CSV as a series.
///
/// Trailing empty cells are dropped, so a column that was padded with empty
/// cells comes back at its own length. Empty cells inside the series read as
/// zero.
///
/// # Errors
///
/// Returns an error if a named column is requested without headers or is
/// not present, if a cell is not numeric, or if the column holds no data.
pub fn load_series_csv<P: AsRef<Path>>(
    path: P,
    has_headers: bool,
    column: &ColumnSelector,
) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let mut reader = open_reader(path, has_headers)?;

    let index = match column {
        ColumnSelector::Index(index) => *index,
        ColumnSelector::Name(name) => {
            if !has_headers {
                return Err(LoaderError::MissingColumns(format!(
                    "'{}' (file read without headers)",
                    name
                )));
            }
            reader
                .headers()?
                .iter()
                .position(|h| h == name.as_str())
                .ok_or_else(|| {
                    LoaderError::MissingColumns(format!("'{}' in {}", name, path.display()))
                })?
        }
    };

    let mut values = Vec::with_capacity(1024);
    let mut filled = 0;
    for (row_idx, result) in reader.records().enumerate() {
        let record = result?;
        let field = record.get(index).unwrap_or("");
        values.push(parse_cell(field, row_idx, index)?);
        if !field.is_empty() {
            filled = values.len();
        }
    }
    values.truncate(filled);

    if values.is_empty() {
        return Err(LoaderError::EmptyFile(path.to_path_buf()));
    }

    Ok(values)
}

/// Load one series per file and combine them into a zero-padded [`Table`].
///
/// Columns follow the order of `paths` and are labelled by file stem.
pub fn load_series_from_files(
    paths: &[PathBuf],
    has_headers: bool,
    column: &ColumnSelector,
) -> Result<Table> {
    if paths.is_empty() {
        return Err(LoaderError::NoInputs);
    }

    let mut labels = Vec::with_capacity(paths.len());
    let mut series = Vec::with_capacity(paths.len());

    for path in paths {
        let label = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        series.push(load_series_csv(path, has_headers, column)?);
        labels.push(label);
    }

    Ok(Table::from_series(labels, series)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        write!(file, "{}", content).unwrap();
        path
    }

    #[test]
    fn test_load_table_csv_with_headers() -> Result<()> {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "a,b").unwrap();
        writeln!(file, "1.0,4").unwrap();
        writeln!(file, "2.5,").unwrap();
        writeln!(file, "3").unwrap();
        file.flush().unwrap();

        let table = load_table_csv(file.path(), true)?;
        assert_eq!(table.labels(), &["a".to_string(), "b".to_string()]);
        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.column(0), Some(&[1.0, 2.5, 3.0][..]));
        assert_eq!(table.column(1), Some(&[4.0, 0.0, 0.0][..]));

        Ok(())
    }

    #[test]
    fn test_load_table_csv_without_headers() -> Result<()> {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1,2,3").unwrap();
        writeln!(file, "4,5").unwrap();
        file.flush().unwrap();

        let table = load_table_csv(file.path(), false)?;
        assert_eq!(table.n_cols(), 3);
        assert_eq!(table.labels()[2], "2");
        assert_eq!(table.column(2), Some(&[3.0, 0.0][..]));

        Ok(())
    }

    #[test]
    fn test_load_table_csv_empty() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "a,b").unwrap();
        file.flush().unwrap();

        let result = load_table_csv(file.path(), true);
        assert!(matches!(result, Err(LoaderError::EmptyFile(_))));
    }

    #[test]
    fn test_load_table_csv_bad_cell() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "a").unwrap();
        writeln!(file, "1").unwrap();
        writeln!(file, "oops").unwrap();
        file.flush().unwrap();

        let result = load_table_csv(file.path(), true);
        assert!(matches!(result, Err(LoaderError::ParseError(_))));
    }

    #[test]
    fn test_load_series_by_name_drops_trailing_padding() -> Result<()> {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "time,signal").unwrap();
        writeln!(file, "0,1").unwrap();
        writeln!(file, "1,0").unwrap();
        writeln!(file, "2,3").unwrap();
        writeln!(file, "3,").unwrap();
        file.flush().unwrap();

        let series = load_series_csv(file.path(), true, &ColumnSelector::Name("signal".into()))?;
        assert_eq!(series, vec![1.0, 0.0, 3.0]);

        Ok(())
    }

    #[test]
    fn test_load_series_missing_column() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "a").unwrap();
        writeln!(file, "1").unwrap();
        file.flush().unwrap();

        let result = load_series_csv(file.path(), true, &ColumnSelector::Name("b".into()));
        assert!(matches!(result, Err(LoaderError::MissingColumns(_))));

        let result = load_series_csv(file.path(), false, &ColumnSelector::Name("a".into()));
        assert!(matches!(result, Err(LoaderError::MissingColumns(_))));
    }

    #[test]
    fn test_load_series_from_files() -> Result<()> {
        let temp_dir = TempDir::new().unwrap();
        let long = write_file(temp_dir.path(), "long.csv", "v\n1\n2\n3\n");
        let short = write_file(temp_dir.path(), "short.csv", "v\n5\n");

        let table = load_series_from_files(&[long, short], true, &ColumnSelector::Index(0))?;
        assert_eq!(table.labels(), &["long".to_string(), "short".to_string()]);
        assert_eq!(table.column(1), Some(&[5.0, 0.0, 0.0][..]));

        Ok(())
    }

    #[test]
    fn test_load_series_from_no_files() {
        let result = load_series_from_files(&[], true, &ColumnSelector::default());
        assert!(matches!(result, Err(LoaderError::NoInputs)));
    }

    #[test]
    fn test_column_selector_parse() {
        assert_eq!("2".parse::<ColumnSelector>().unwrap(), ColumnSelector::Index(2));
        assert_eq!(
            "signal".parse::<ColumnSelector>().unwrap(),
            ColumnSelector::Name("signal".into())
        );
        assert_eq!(ColumnSelector::Index(3).to_string(), "3");
    }
}
