//! Configuration types for the realignment pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::processors::alignment::AlignMode;

/// Configuration for column realignment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlignmentConfig {
    /// Feature used to line columns up (`max` or `center`)
    #[serde(default)]
    pub mode: AlignMode,
}

/// Configuration for locating and reading input files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Whether input CSVs carry a header row
    #[serde(default = "default_has_headers")]
    pub has_headers: bool,

    /// Column taken from each file when combining one series per file
    /// (a numeric index or a header name)
    #[serde(default = "default_column")]
    pub column: String,
}

fn default_has_headers() -> bool {
    true
}

fn default_column() -> String {
    "0".to_string()
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            has_headers: default_has_headers(),
            column: default_column(),
        }
    }
}

/// Configuration for output file naming.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Suffix appended to the input stem for the aligned table
    #[serde(default = "default_aligned_suffix")]
    pub aligned_suffix: String,

    /// Suffix appended to the input stem for the shift table
    #[serde(default = "default_shifts_suffix")]
    pub shifts_suffix: String,
}

fn default_aligned_suffix() -> String {
    "_aligned".to_string()
}

fn default_shifts_suffix() -> String {
    "_shifts".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            aligned_suffix: default_aligned_suffix(),
            shifts_suffix: default_shifts_suffix(),
        }
    }
}

/// Configuration for rendering tables to PNG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Image width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Image height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Stroke width of each series
    #[serde(default = "default_line_width")]
    pub line_width: u32,
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

fn default_line_width() -> u32 {
    2
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            line_width: default_line_width(),
        }
    }
}

/// Main pipeline configuration combining all sub-configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub alignment: AlignmentConfig,

    #[serde(default)]
    pub discovery: DiscoveryConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub plot: PlotConfig,
}

impl PipelineConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
