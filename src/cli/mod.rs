//! Command-line interface for the realignment pipeline.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::core::loaders::{self, ColumnSelector};
use crate::core::writers;
use crate::processors::alignment::{self, AlignMode, Realignment};
use crate::processors::discovery::{self, PathPattern};
use crate::PipelineConfig;

#[derive(Parser)]
#[command(name = "signal-realign")]
#[command(about = "Locate signal CSVs and realign zero-padded columns", version)]
pub struct Cli {
    /// Path to YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List files matching a pattern in natural sort order
    Find {
        /// Pattern, or path segments joined before globbing
        #[arg(required = true)]
        segments: Vec<String>,
    },

    /// Realign the columns of one CSV table
    Align {
        /// Input CSV table
        input: PathBuf,
        /// Output CSV for the aligned table
        output: PathBuf,
        /// Alignment mode: max or center
        #[arg(short, long)]
        mode: Option<AlignMode>,
        /// Write per-column shifts to this CSV
        #[arg(short, long)]
        shifts: Option<PathBuf>,
        /// Input has no header row
        #[arg(long)]
        no_headers: bool,
    },

    /// Take one series from each matched file, then realign them together
    AlignFiles {
        /// Pattern, or path segments joined before globbing
        #[arg(required = true)]
        segments: Vec<String>,
        /// Output CSV for the aligned table
        #[arg(short, long)]
        output: PathBuf,
        /// Column to read from each file (index or header name)
        #[arg(long)]
        column: Option<ColumnSelector>,
        /// Alignment mode: max or center
        #[arg(short, long)]
        mode: Option<AlignMode>,
        /// Write per-column shifts to this CSV
        #[arg(short, long)]
        shifts: Option<PathBuf>,
        /// Inputs have no header row
        #[arg(long)]
        no_headers: bool,
    },

    /// Realign every matched table file independently
    Batch {
        /// Pattern, or path segments joined before globbing
        #[arg(required = true)]
        segments: Vec<String>,
        /// Output directory for aligned tables and shifts
        #[arg(short, long)]
        output_dir: PathBuf,
        /// Alignment mode: max or center
        #[arg(short, long)]
        mode: Option<AlignMode>,
        /// Limit number of files to process
        #[arg(long)]
        limit: Option<usize>,
        /// Inputs have no header row
        #[arg(long)]
        no_headers: bool,
    },

    /// Plot the columns of a CSV table as line series (PNG)
    Plot {
        /// Input CSV table
        input: PathBuf,
        /// Output PNG file path (defaults to same name as input with .png extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Input has no header row
        #[arg(long)]
        no_headers: bool,
    },
}

/// One pattern string for a single argument, joined segments otherwise.
fn to_pattern(segments: Vec<String>) -> PathPattern {
    if segments.len() == 1 {
        PathPattern::from(segments.into_iter().next().unwrap_or_default())
    } else {
        PathPattern::from(segments)
    }
}

/// Create a spinner for indeterminate operations
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Print a summary box
fn print_summary(title: &str, items: &[(&str, String)]) {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║ {:<62} ║", title);
    println!("╠══════════════════════════════════════════════════════════════╣");
    for (key, value) in items {
        let display_value = if value.chars().count() > 39 {
            let head: String = value.chars().take(36).collect();
            format!("{}...", head)
        } else {
            value.clone()
        };
        println!("║ {:<20}: {:<39} ║", key, display_value);
    }
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
}

/// Log an error and exit with status 1.
fn fail(spinner: Option<&ProgressBar>, what: &str, e: &dyn std::fmt::Display) -> ! {
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    error!("{} failed: {}", what, e);
    std::process::exit(1);
}

pub fn run() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity (must come first)
    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .format_timestamp_secs()
        .init();

    // Load config
    let config = match &cli.config {
        Some(path) => match PipelineConfig::from_yaml(path) {
            Ok(cfg) => {
                info!("Loaded config from: {}", path.display());
                cfg
            }
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}, using defaults",
                    path.display(),
                    e
                );
                PipelineConfig::default()
            }
        },
        None => PipelineConfig::default(),
    };

    match cli.command {
        Commands::Find { segments } => {
            cmd_find(segments);
        }
        Commands::Align { input, output, mode, shifts, no_headers } => {
            let mode = mode.unwrap_or(config.alignment.mode);
            let has_headers = config.discovery.has_headers && !no_headers;
            cmd_align(&input, &output, mode, shifts.as_deref(), has_headers);
        }
        Commands::AlignFiles { segments, output, column, mode, shifts, no_headers } => {
            let mode = mode.unwrap_or(config.alignment.mode);
            let has_headers = config.discovery.has_headers && !no_headers;
            let column = column.unwrap_or_else(|| {
                config
                    .discovery
                    .column
                    .parse()
                    .unwrap_or_default()
            });
            cmd_align_files(segments, &output, &column, mode, shifts.as_deref(), has_headers);
        }
        Commands::Batch { segments, output_dir, mode, limit, no_headers } => {
            let mut alignment_config = config.alignment.clone();
            if let Some(mode) = mode {
                alignment_config.mode = mode;
            }
            let has_headers = config.discovery.has_headers && !no_headers;
            cmd_batch(segments, &output_dir, &alignment_config, limit, has_headers, &config);
        }
        Commands::Plot { input, output, no_headers } => {
            let has_headers = config.discovery.has_headers && !no_headers;
            cmd_plot(&input, output, has_headers, &config);
        }
    }
}

fn cmd_find(segments: Vec<String>) {
    let pattern = to_pattern(segments);

    match discovery::get_files(&pattern) {
        Ok(files) => {
            for file in files {
                println!("{}", file.display());
            }
        }
        Err(e) => fail(None, "File discovery", &e),
    }
}

fn write_outputs(realignment: &Realignment, output: &Path, shifts: Option<&Path>) {
    if let Err(e) = writers::write_table_csv(output, &realignment.table) {
        fail(None, "Writing aligned table", &e);
    }
    if let Some(shifts_path) = shifts {
        if let Err(e) =
            writers::write_shifts_csv(shifts_path, realignment.table.labels(), &realignment.shifts)
        {
            fail(None, "Writing shifts", &e);
        }
    }
}

fn summary_items(realignment: &Realignment, mode: AlignMode) -> Vec<(&'static str, String)> {
    let reference_label = realignment
        .table
        .labels()
        .get(realignment.reference_column)
        .cloned()
        .unwrap_or_default();

    vec![
        ("Mode", mode.to_string()),
        ("Rows", realignment.table.n_rows().to_string()),
        ("Columns", realignment.table.n_cols().to_string()),
        ("Reference column", reference_label),
        ("Reference row", realignment.reference_feature.to_string()),
        ("Shifts", format!("{:?}", realignment.shifts)),
    ]
}

fn cmd_align(
    input: &Path,
    output: &Path,
    mode: AlignMode,
    shifts: Option<&Path>,
    has_headers: bool,
) {
    let start = Instant::now();

    println!("Realigning table...");
    println!("Input: {}", input.display());
    println!("Output: {}", output.display());

    let spinner = create_spinner("Loading table...");

    let table = match loaders::load_table_csv(input, has_headers) {
        Ok(t) => t,
        Err(e) => fail(Some(&spinner), "Loading table", &e),
    };

    spinner.set_message(format!("Aligning {} columns...", table.n_cols()));

    let realignment = match alignment::realign_data(&table, mode) {
        Ok(r) => r,
        Err(e) => fail(Some(&spinner), "Realignment", &e),
    };

    write_outputs(&realignment, output, shifts);
    spinner.finish_and_clear();

    let mut items = vec![
        ("Input file", input.display().to_string()),
        ("Output file", output.display().to_string()),
    ];
    items.extend(summary_items(&realignment, mode));
    items.push(("Duration", format!("{:.2?}", start.elapsed())));

    print_summary("Realignment Complete", &items);
}

fn cmd_align_files(
    segments: Vec<String>,
    output: &Path,
    column: &ColumnSelector,
    mode: AlignMode,
    shifts: Option<&Path>,
    has_headers: bool,
) {
    let start = Instant::now();
    let pattern = to_pattern(segments);

    let spinner = create_spinner("Locating input files...");

    let files = match discovery::get_files(&pattern) {
        Ok(f) => f,
        Err(e) => fail(Some(&spinner), "File discovery", &e),
    };

    spinner.set_message(format!("Loading column {} from {} files...", column, files.len()));

    let table = match loaders::load_series_from_files(&files, has_headers, column) {
        Ok(t) => t,
        Err(e) => fail(Some(&spinner), "Loading series", &e),
    };

    let realignment = match alignment::realign_data(&table, mode) {
        Ok(r) => r,
        Err(e) => fail(Some(&spinner), "Realignment", &e),
    };

    write_outputs(&realignment, output, shifts);
    spinner.finish_and_clear();

    let mut items = vec![
        ("Files", files.len().to_string()),
        ("Column", column.to_string()),
        ("Output file", output.display().to_string()),
    ];
    items.extend(summary_items(&realignment, mode));
    items.push(("Duration", format!("{:.2?}", start.elapsed())));

    print_summary("File Realignment Complete", &items);
}

fn cmd_batch(
    segments: Vec<String>,
    output_dir: &Path,
    alignment_config: &crate::config::AlignmentConfig,
    limit: Option<usize>,
    has_headers: bool,
    config: &PipelineConfig,
) {
    use crate::processors::batch;

    let start = Instant::now();
    let pattern = to_pattern(segments);

    println!("Realigning tables in batch mode...");
    println!("Output directory: {}", output_dir.display());
    if let Some(lim) = limit {
        println!("Processing limit: {} files", lim);
    }

    let files = match discovery::get_files(&pattern) {
        Ok(f) => f,
        Err(e) => fail(None, "File discovery", &e),
    };

    let spinner = create_spinner(&format!("Aligning {} tables...", files.len()));

    let outcomes = batch::align_files(
        &files,
        output_dir,
        has_headers,
        alignment_config,
        &config.output,
        limit,
    );

    spinner.finish_and_clear();

    let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
    let failed = outcomes.len() - succeeded;

    for outcome in outcomes.iter().filter(|o| !o.is_ok()) {
        if let Err(e) = &outcome.result {
            warn!("{}: {:#}", outcome.input.display(), e);
        }
    }

    print_summary(
        "Batch Realignment Complete",
        &[
            ("Output directory", output_dir.display().to_string()),
            ("Mode", alignment_config.mode.to_string()),
            ("Files processed", outcomes.len().to_string()),
            ("Succeeded", succeeded.to_string()),
            ("Failed", failed.to_string()),
            ("Duration", format!("{:.2?}", start.elapsed())),
        ],
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn cmd_plot(input: &Path, output: Option<PathBuf>, has_headers: bool, config: &PipelineConfig) {
    use crate::visualization;

    let start = Instant::now();

    // Default output path: same name as input with .png extension
    let output_path = output.unwrap_or_else(|| input.with_extension("png"));

    println!("Plotting table...");
    println!("Input: {}", input.display());
    println!("Output: {}", output_path.display());

    let spinner = create_spinner("Loading table...");

    let table = match loaders::load_table_csv(input, has_headers) {
        Ok(t) => t,
        Err(e) => fail(Some(&spinner), "Loading table", &e),
    };

    spinner.set_message("Generating plot...");

    match visualization::plot_table(&output_path, &table, &config.plot) {
        Ok(()) => {
            spinner.finish_and_clear();

            print_summary(
                "Plot Complete",
                &[
                    ("Input file", input.display().to_string()),
                    ("Output PNG", output_path.display().to_string()),
                    ("Columns", table.n_cols().to_string()),
                    ("Rows", table.n_rows().to_string()),
                    ("Duration", format!("{:.2?}", start.elapsed())),
                ],
            );
        }
        Err(e) => fail(Some(&spinner), "Visualization", &e),
    }
}
