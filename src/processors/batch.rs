//! Batch realignment of many table files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::{error, info};
use rayon::prelude::*;

use super::alignment::{realign_data, AlignMode, Realignment};
use crate::config::{AlignmentConfig, OutputConfig};
use crate::core::loaders::load_table_csv;
use crate::core::writers::{write_shifts_csv, write_table_csv};

/// Output paths and shifts for one successfully aligned file.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedFile {
    pub aligned_path: PathBuf,
    pub shifts_path: PathBuf,
    pub shifts: Vec<isize>,
}

/// Result of aligning one input file.
#[derive(Debug)]
pub struct BatchOutcome {
    pub input: PathBuf,
    pub result: Result<AlignedFile>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

struct AlignTask {
    idx: usize,
    src: PathBuf,
    aligned_dest: PathBuf,
    shifts_dest: PathBuf,
    /// Destination also claimed by another input.
    conflict: Option<PathBuf>,
}

/// Mark every task whose aligned or shifts destination is claimed more than once.
fn mark_conflicts(tasks: &mut [AlignTask]) {
    let mut claims: HashMap<PathBuf, usize> = HashMap::new();
    for task in tasks.iter() {
        *claims.entry(task.aligned_dest.clone()).or_insert(0) += 1;
        *claims.entry(task.shifts_dest.clone()).or_insert(0) += 1;
    }

    for task in tasks.iter_mut() {
        task.conflict = [&task.aligned_dest, &task.shifts_dest]
            .into_iter()
            .find(|dest| claims.get(*dest).copied().unwrap_or(0) > 1)
            .cloned();
    }
}

/// Build `<output_dir>/<stem><suffix>.csv`.
pub fn output_path(output_dir: &Path, input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "table".to_string());
    output_dir.join(format!("{}{}.csv", stem, suffix))
}

/// Load a CSV table, realign it and write the aligned table and its shifts.
pub fn align_file(
    input: &Path,
    aligned_dest: &Path,
    shifts_dest: &Path,
    has_headers: bool,
    mode: AlignMode,
) -> Result<Realignment> {
    let table = load_table_csv(input, has_headers)
        .with_context(|| format!("Failed to load table: {}", input.display()))?;

    let realignment = realign_data(&table, mode)
        .with_context(|| format!("Failed to realign {}", input.display()))?;

    write_table_csv(aligned_dest, &realignment.table)
        .with_context(|| format!("Failed to write aligned table: {}", aligned_dest.display()))?;
    write_shifts_csv(shifts_dest, realignment.table.labels(), &realignment.shifts)
        .with_context(|| format!("Failed to write shifts: {}", shifts_dest.display()))?;

    Ok(realignment)
}

/// Align every input table in parallel.
///
/// Each input produces `<stem><aligned_suffix>.csv` and
/// `<stem><shifts_suffix>.csv` in `output_dir`. A failing file is reported in
/// its outcome and does not stop the others. Inputs whose outputs would
/// land on the same path (same stem in different directories) all fail
/// without writing anything.
///
/// # Arguments
///
/// * `inputs` - Table CSV files to align
/// * `output_dir` - Directory receiving the outputs
/// * `has_headers` - Whether the inputs carry a header row
/// * `alignment` - Alignment mode
/// * `output` - Output naming
/// * `limit` - Process at most this many files
///
/// # Returns
///
/// One outcome per processed input, in input order.
pub fn align_files(
    inputs: &[PathBuf],
    output_dir: &Path,
    has_headers: bool,
    alignment: &AlignmentConfig,
    output: &OutputConfig,
    limit: Option<usize>,
) -> Vec<BatchOutcome> {
    let mut tasks: Vec<AlignTask> = inputs
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .enumerate()
        .map(|(idx, src)| AlignTask {
            idx,
            src: src.clone(),
            aligned_dest: output_path(output_dir, src, &output.aligned_suffix),
            shifts_dest: output_path(output_dir, src, &output.shifts_suffix),
            conflict: None,
        })
        .collect();
    mark_conflicts(&mut tasks);

    tasks
        .par_iter()
        .map(|task| {
            let result = match &task.conflict {
                Some(dest) => Err(anyhow!(
                    "Output {} is shared with another input",
                    dest.display()
                )),
                None => align_file(
                    &task.src,
                    &task.aligned_dest,
                    &task.shifts_dest,
                    has_headers,
                    alignment.mode,
                )
                .map(|realignment| AlignedFile {
                    aligned_path: task.aligned_dest.clone(),
                    shifts_path: task.shifts_dest.clone(),
                    shifts: realignment.shifts,
                }),
            };

            match &result {
                Ok(aligned) => info!(
                    "[{:04}] {} -> {} (shifts {:?})",
                    task.idx,
                    task.src.display(),
                    aligned.aligned_path.display(),
                    aligned.shifts
                ),
                Err(e) => error!("[{:04}] {}: {:#}", task.idx, task.src.display(), e),
            }

            BatchOutcome {
                input: task.src.clone(),
                result,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn create_table_csv(dir: &Path, name: &str, rows: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        writeln!(file, "a,b").unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        path
    }

    #[test]
    fn test_output_path() {
        let path = output_path(Path::new("out"), Path::new("data/run7.csv"), "_aligned");
        assert_eq!(path, PathBuf::from("out/run7_aligned.csv"));
    }

    #[test]
    fn test_align_files() {
        let temp_dir = TempDir::new().unwrap();
        let good = create_table_csv(temp_dir.path(), "good.csv", &["1,9", "5,1", "1,"]);
        let bad = create_table_csv(temp_dir.path(), "bad.csv", &["1,0", "2,0"]);
        let out_dir = temp_dir.path().join("out");

        let outcomes = align_files(
            &[good.clone(), bad.clone()],
            &out_dir,
            true,
            &AlignmentConfig::default(),
            &OutputConfig::default(),
            None,
        );

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].input, good);
        assert_eq!(outcomes[1].input, bad);

        let aligned = outcomes[0].result.as_ref().unwrap();
        assert_eq!(aligned.shifts, vec![0, 1]);
        assert!(out_dir.join("good_aligned.csv").exists());

        let shifts = fs::read_to_string(out_dir.join("good_shifts.csv")).unwrap();
        assert_eq!(shifts.lines().collect::<Vec<_>>(), vec!["column,shift", "a,0", "b,1"]);

        assert!(!outcomes[1].is_ok());
        assert!(!out_dir.join("bad_aligned.csv").exists());
    }

    #[test]
    fn test_align_files_limit() {
        let temp_dir = TempDir::new().unwrap();
        let first = create_table_csv(temp_dir.path(), "first.csv", &["1,2"]);
        let second = create_table_csv(temp_dir.path(), "second.csv", &["1,2"]);

        let outcomes = align_files(
            &[first, second],
            temp_dir.path(),
            true,
            &AlignmentConfig::default(),
            &OutputConfig::default(),
            Some(1),
        );

        assert_eq!(outcomes.len(), 1);
    }

    #[test]
    fn test_align_files_same_stem_conflict() {
        let temp_dir = TempDir::new().unwrap();
        let run_1 = temp_dir.path().join("run_1");
        let run_2 = temp_dir.path().join("run_2");
        fs::create_dir_all(&run_1).unwrap();
        fs::create_dir_all(&run_2).unwrap();
        let first = create_table_csv(&run_1, "trace.csv", &["1,2", "3,1"]);
        let second = create_table_csv(&run_2, "trace.csv", &["1,2", "3,1"]);
        let other = create_table_csv(&run_2, "other.csv", &["1,2", "3,1"]);
        let out_dir = temp_dir.path().join("out");

        let outcomes = align_files(
            &[first, second, other],
            &out_dir,
            true,
            &AlignmentConfig::default(),
            &OutputConfig::default(),
            None,
        );

        assert!(!outcomes[0].is_ok());
        assert!(!outcomes[1].is_ok());
        assert!(outcomes[2].is_ok());

        let message = format!("{:#}", outcomes[0].result.as_ref().unwrap_err());
        assert!(message.contains("trace_aligned.csv"));
        assert!(!out_dir.join("trace_aligned.csv").exists());
        assert!(!out_dir.join("trace_shifts.csv").exists());
        assert!(out_dir.join("other_aligned.csv").exists());
    }

    #[test]
    fn test_align_files_equal_suffixes_conflict() {
        let temp_dir = TempDir::new().unwrap();
        let input = create_table_csv(temp_dir.path(), "solo.csv", &["1,2"]);
        let output = OutputConfig {
            aligned_suffix: "_out".to_string(),
            shifts_suffix: "_out".to_string(),
        };

        let outcomes = align_files(
            &[input],
            temp_dir.path(),
            true,
            &AlignmentConfig::default(),
            &output,
            None,
        );

        assert!(!outcomes[0].is_ok());
    }
}
