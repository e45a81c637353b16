//! Realignment pipeline for zero-padded signal tables.
//!
//! This crate provides tools for:
//! - Locating input files by glob pattern in natural sort order
//! - Loading numeric CSV tables, or one series per file, zero-padded to a common length
//! - Shifting every column so its peak or support midpoint lines up with the
//!   column that has the fewest zero entries
//! - Writing aligned tables and per-column shifts, and plotting them
//!
//! # Example
//!
//! ```no_run
//! use signal_realign::{get_files, load_series_from_files, realign_data, AlignMode, PathPattern};
//! use signal_realign::core::ColumnSelector;
//!
//! let files = get_files(&PathPattern::from("data/trace_*.csv")).unwrap();
//! let table = load_series_from_files(&files, true, &ColumnSelector::Index(0)).unwrap();
//! let (aligned, shifts) = realign_data(&table, AlignMode::Max).unwrap().into_parts();
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod processors;
pub mod visualization;

pub use crate::config::{AlignmentConfig, DiscoveryConfig, OutputConfig, PipelineConfig, PlotConfig};
pub use crate::core::loaders::load_series_from_files;
pub use crate::core::table::Table;
pub use crate::processors::alignment::{find_middle, realign_data, AlignError, AlignMode, Realignment};
pub use crate::processors::discovery::{get_files, PathPattern};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
