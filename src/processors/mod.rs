//! Data processing modules.

pub mod alignment;
pub mod batch;
pub mod discovery;

// Re-export key types for convenience
pub use alignment::{
    find_middle, realign_data, reference_column, shift_column, AlignError, AlignMode,
    Realignment,
};
pub use batch::{align_file, align_files, AlignedFile, BatchOutcome};
pub use discovery::{get_files, natural_sort, DiscoveryError, PathPattern};
