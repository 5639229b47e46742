use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use nf_ast::ConvertOptions;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{BatchError, FileFailure};
use crate::file::convert_file;

/// Outcome of one converted file in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRecord {
    pub source_path: PathBuf,
    /// Where the result was written, when an output directory was given.
    pub output_path: Option<PathBuf>,
    pub result: String,
}

/// Convert every file matched by `pattern`.
///
/// Files are converted in parallel. With `output_dir`, each file is written
/// to `output_dir` joined with its path relative to [`common_root`]; files
/// outside that root keep their whole path below `output_dir`.
///
/// Every file is attempted even after a failure. Successful files are
/// written; if any file failed, or a directory could not be read while
/// expanding the pattern, [`BatchError::Failed`] lists all of them.
/// Records come back in the pattern's (sorted) match order.
pub fn convert_batch(
    pattern: &str,
    output_dir: Option<&Path>,
    options: &ConvertOptions,
) -> Result<Vec<BatchRecord>, BatchError> {
    let Matches {
        files,
        mut failures,
    } = expand(pattern)?;
    if files.is_empty() && failures.is_empty() {
        tracing::warn!(pattern, "pattern matched no files");
        return Ok(Vec::new());
    }

    let root = common_root(&files);
    tracing::debug!(pattern, files = files.len(), root = %root.display(), "converting batch");

    let targets = match output_dir {
        Some(dir) => plan_outputs(dir, &root, &files),
        None => files.iter().map(|_| Ok(None)).collect(),
    };

    let outcomes: Vec<Result<BatchRecord, BatchError>> = files
        .par_iter()
        .zip(targets)
        .map(|(source_path, target)| {
            let output_path = target?;
            let result = convert_file(source_path, output_path.as_deref(), options)?;
            Ok(BatchRecord {
                source_path: source_path.clone(),
                output_path,
                result,
            })
        })
        .collect();

    let total = outcomes.len() + failures.len();
    let mut records = Vec::with_capacity(outcomes.len());
    for (path, outcome) in files.into_iter().zip(outcomes) {
        match outcome {
            Ok(record) => records.push(record),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "conversion failed");
                failures.push(FileFailure { path, error });
            }
        }
    }

    if failures.is_empty() {
        Ok(records)
    } else {
        Err(BatchError::Failed { total, failures })
    }
}

/// Concatenate the converted texts in record order.
pub fn concat_results(records: &[BatchRecord]) -> String {
    records.iter().map(|r| r.result.as_str()).collect()
}

/// The directory of the shortest matched path. Ties go to the earliest match.
pub fn common_root(files: &[PathBuf]) -> PathBuf {
    files
        .iter()
        .min_by_key(|p| p.as_os_str().len())
        .and_then(|p| p.parent())
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

struct Matches {
    files: Vec<PathBuf>,
    failures: Vec<FileFailure>,
}

fn expand(pattern: &str) -> Result<Matches, BatchError> {
    let paths = glob::glob(pattern).map_err(|e| BatchError::Pattern {
        pattern: pattern.to_string(),
        source: e,
    })?;

    Ok(partition_matches(paths.map(|entry| {
        entry.map_err(|e| {
            let path = e.path().to_path_buf();
            FileFailure {
                path: path.clone(),
                error: BatchError::Io {
                    path,
                    source: e.into_error(),
                },
            }
        })
    })))
}

/// Keep matched files; unreadable entries become failures instead of
/// aborting the batch.
fn partition_matches<I>(entries: I) -> Matches
where
    I: IntoIterator<Item = Result<PathBuf, FileFailure>>,
{
    let mut matches = Matches {
        files: Vec::new(),
        failures: Vec::new(),
    };
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => matches.files.push(path),
            Ok(_) => {}
            Err(failure) => {
                tracing::warn!(
                    path = %failure.path.display(),
                    error = %failure.error,
                    "unreadable match"
                );
                matches.failures.push(failure);
            }
        }
    }
    matches
}

/// Output path of every file, in file order. A second file landing on an
/// already claimed output is refused rather than written twice.
fn plan_outputs(
    output_dir: &Path,
    root: &Path,
    files: &[PathBuf],
) -> Vec<Result<Option<PathBuf>, BatchError>> {
    let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
    files
        .iter()
        .map(|source_path| {
            let output = mirror(output_dir, root, source_path);
            if let Some(first) = claimed.get(&output) {
                return Err(BatchError::OutputCollision {
                    output,
                    claimed_by: first.to_path_buf(),
                });
            }
            claimed.insert(output.clone(), source_path);
            Ok(Some(output))
        })
        .collect()
}

fn mirror(output_dir: &Path, root: &Path, source_path: &Path) -> PathBuf {
    match source_path.strip_prefix(root) {
        Ok(relative) => output_dir.join(relative),
        // Outside the root: keep the whole path, minus root and prefix.
        Err(_) => output_dir.join(
            source_path
                .components()
                .filter(|c| matches!(c, Component::Normal(_)))
                .collect::<PathBuf>(),
        ),
    }
}
