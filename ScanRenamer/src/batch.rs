//! Batch archive processing
//!
//! Finds the archives in a folder and runs the pipeline over each of them,
//! one at a time. A failed archive is recorded and the batch carries on.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::config::RenameConfig;
use crate::error::Result;
use crate::pipeline::{AssetPipeline, JobReport, RenamePhase, RenameProgress};

/// Result of a batch run
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchRenameResult {
    /// Number of archives processed without error
    pub success_count: usize,
    /// Number of archives that failed at some stage
    pub fail_count: usize,
    /// One report per archive, in input order
    pub reports: Vec<JobReport>,
}

impl BatchRenameResult {
    /// Final status line of a batch; per-archive failures live in `reports`
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn status(&self) -> &'static str {
        "Done"
    }

    /// Reports of the archives that failed
    pub fn failures(&self) -> impl Iterator<Item = &JobReport> {
        self.reports.iter().filter(|r| !r.is_success())
    }
}

/// Find the `.zip` files directly inside `dir`
///
/// Subdirectories are not searched. The match on the extension ignores case.
///
/// # Returns
/// A sorted list of archive paths.
///
/// # Errors
///
/// Returns an error if `dir` cannot be read.
pub fn find_archive_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut archives = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
        {
            archives.push(entry.into_path());
        }
    }

    archives.sort();
    Ok(archives)
}

/// Run the pipeline over `archives`, moving results into `output_dir`
///
/// # Arguments
/// * `archives` - Archives to process, in order
/// * `output_dir` - Destination for renamed files (created if missing)
/// * `config` - Pipeline configuration
/// * `progress` - Called once per archive before it is processed
///
/// # Errors
///
/// Returns an error only if `output_dir` cannot be created; per-archive
/// failures are reported in the result.
pub fn process_batch<F>(
    archives: &[PathBuf],
    output_dir: &Path,
    config: &RenameConfig,
    progress: F,
) -> Result<BatchRenameResult>
where
    F: Fn(&RenameProgress) + Send + Sync,
{
    fs::create_dir_all(output_dir)?;

    let pipeline = AssetPipeline::new(config.clone());
    let total = archives.len();
    let mut result = BatchRenameResult::default();

    for (i, archive) in archives.iter().enumerate() {
        let display = archive
            .file_name()
            .map_or_else(|| archive.display().to_string(), |n| n.to_string_lossy().to_string());
        progress(&RenameProgress::with_file(RenamePhase::Archive, i + 1, total, display));

        let report = pipeline.process_archive(archive, output_dir);
        if report.is_success() {
            result.success_count += 1;
        } else {
            result.fail_count += 1;
        }
        result.reports.push(report);
    }

    progress(&RenameProgress::new(RenamePhase::Complete, total, total));
    tracing::info!(
        "Batch finished: {} succeeded, {} failed",
        result.success_count,
        result.fail_count
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_find_archive_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.zip"), "").unwrap();
        fs::write(temp.path().join("A.ZIP"), "").unwrap();
        fs::write(temp.path().join("notes.txt"), "").unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested").join("c.zip"), "").unwrap();
        fs::create_dir(temp.path().join("dir.zip")).unwrap();

        let found = find_archive_files(temp.path()).unwrap();

        assert_eq!(
            found,
            vec![temp.path().join("A.ZIP"), temp.path().join("b.zip")]
        );
    }

    #[test]
    fn test_find_archive_files_missing_dir() {
        let temp = TempDir::new().unwrap();
        assert!(find_archive_files(temp.path().join("missing")).is_err());
    }

    #[test]
    fn test_empty_batch() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");

        let result = process_batch(&[], &out, &RenameConfig::default(), |_| {}).unwrap();

        assert_eq!(result.success_count, 0);
        assert_eq!(result.fail_count, 0);
        assert_eq!(result.status(), "Done");
        assert!(out.is_dir());
    }
}
