//! Core data types and I/O operations.

pub mod loaders;
pub mod table;
pub mod writers;

pub use loaders::{load_series_from_files, load_table_csv, ColumnSelector, LoaderError};
pub use table::{Table, TableError};
pub use writers::{write_shifts_csv, write_table_csv, WriteError};
