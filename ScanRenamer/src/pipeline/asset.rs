//! Extract, rename, patch and relocate one archive

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::job::ArchiveJob;
use super::outcome::{JobReport, JobStage, ScratchDisposition};
use super::relocate::move_file;
use super::scratch::ScratchDir;
use super::types::{ProgressCallback, RenamePhase, RenameProgress};
use crate::archive::ArchiveReader;
use crate::config::RenameConfig;
use crate::error::{Error, Result};
use crate::patch::{PatchKind, PatchOutcome, patch_reference};

/// An error tagged with the stage it happened in
#[derive(Debug)]
struct StageError {
    stage: JobStage,
    error: Error,
}

trait AtStage<T> {
    fn at(self, stage: JobStage) -> std::result::Result<T, StageError>;
}

impl<T> AtStage<T> for Result<T> {
    fn at(self, stage: JobStage) -> std::result::Result<T, StageError> {
        self.map_err(|error| StageError { stage, error })
    }
}

/// Runs archive jobs with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct AssetPipeline {
    config: RenameConfig,
}

impl AssetPipeline {
    #[must_use]
    pub fn new(config: RenameConfig) -> Self {
        Self { config }
    }

    /// Process one archive into `output_dir`
    ///
    /// See [`AssetPipeline::process_archive_with_progress`].
    #[must_use]
    pub fn process_archive(&self, archive: &Path, output_dir: &Path) -> JobReport {
        self.process_archive_with_progress(archive, output_dir, &|_| {})
    }

    /// Process one archive into `output_dir` with progress callback.
    ///
    /// The archive is extracted into `<scratch root>/<base name>`, every
    /// extracted file is renamed to `<base name><kind token>`, `.obj` and
    /// `.mtl` files get their reference line rewritten, and the results
    /// are moved into `output_dir`.
    ///
    /// Failures never escape as errors: the returned report names the
    /// stage that failed. Files already moved stay in `output_dir`.
    #[must_use]
    pub fn process_archive_with_progress(
        &self,
        archive: &Path,
        output_dir: &Path,
        progress: ProgressCallback,
    ) -> JobReport {
        let job = match ArchiveJob::new(archive) {
            Ok(job) => job,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", archive.display(), e);
                return JobReport::new(archive, "").failed(JobStage::Prepare, &e);
            }
        };
        let mut report = JobReport::new(archive, &job.base_name);

        tracing::info!("Processing {} as '{}'", archive.display(), job.base_name);

        if let Err(source) = fs::create_dir_all(output_dir) {
            let e = Error::Io(source);
            tracing::warn!("Cannot create output directory {}: {}", output_dir.display(), e);
            return report.failed(JobStage::Prepare, &e);
        }

        let scratch = match ScratchDir::create(&self.config.scratch_root(), &job.base_name) {
            Ok(scratch) => scratch,
            Err(e) => {
                tracing::warn!("{}: {}", archive.display(), e);
                return report.failed(JobStage::Scratch, &e);
            }
        };

        let result = self.run_job(&job, scratch.path(), output_dir, &mut report, progress);

        progress(&RenameProgress::new(RenamePhase::Cleanup, 0, 1));
        report.scratch = self.dispose_scratch(scratch, result.is_ok());

        match result {
            Ok(()) => tracing::info!(
                "Finished {}: {} file(s) moved",
                archive.display(),
                report.moved.len()
            ),
            Err(StageError { stage, error }) => {
                tracing::warn!("{} failed at {}: {}", archive.display(), stage, error);
                report = report.failed(stage, &error);
            }
        }

        progress(&RenameProgress::new(RenamePhase::Complete, 1, 1));
        report
    }

    fn run_job(
        &self,
        job: &ArchiveJob,
        scratch: &Path,
        output_dir: &Path,
        report: &mut JobReport,
        progress: ProgressCallback,
    ) -> std::result::Result<(), StageError> {
        progress(&RenameProgress::with_file(
            RenamePhase::Extracting,
            0,
            1,
            job.archive.display().to_string(),
        ));

        let summary = ArchiveReader::with_buffer_size(self.config.copy_buffer_size)
            .extract(&job.archive, scratch)
            .at(JobStage::Extract)?;
        tracing::debug!(
            "Extracted {} file(s), {} bytes from {}",
            summary.files_extracted,
            summary.bytes_written,
            job.archive.display()
        );

        if self.config.delete_source {
            match fs::remove_file(&job.archive) {
                Ok(()) => report.source_deleted = true,
                Err(e) => tracing::warn!("Failed to delete {}: {}", job.archive.display(), e),
            }
        }

        let entries = collect_files(scratch).at(JobStage::Scratch)?;
        let total = entries.len();
        report.entries_total = total;

        for (i, entry) in entries.iter().enumerate() {
            let file_name = entry
                .file_name()
                .and_then(OsStr::to_str)
                .ok_or_else(|| Error::InvalidPath(entry.display().to_string()))
                .at(JobStage::Rename)?;
            let token = self.config.kind_token.token(file_name);
            let new_name = job.output_name(file_name, self.config.kind_token);

            progress(&RenameProgress::with_file(RenamePhase::Renaming, i + 1, total, file_name));
            let renamed = rename_in_place(entry, &new_name).at(JobStage::Rename)?;

            if let Some(kind) = PatchKind::from_kind_token(token) {
                progress(&RenameProgress::with_file(RenamePhase::Patching, i + 1, total, &new_name));
                let outcome = patch_reference(&renamed, self.config.rule_for(kind), &job.base_name)
                    .at(JobStage::Patch)?;
                match outcome {
                    PatchOutcome::Rewritten { line } => {
                        tracing::debug!("Patched {} reference on line {}", kind, line);
                    }
                    PatchOutcome::Unchanged => {
                        tracing::debug!("No legacy {} reference in {}", kind, new_name);
                    }
                }
            }

            progress(&RenameProgress::with_file(RenamePhase::Moving, i + 1, total, &new_name));
            let destination = output_dir.join(&new_name);
            move_file(&renamed, &destination).at(JobStage::Move)?;
            tracing::debug!("{} -> {}", file_name, destination.display());
            report.moved.push(destination);
        }

        Ok(())
    }

    fn dispose_scratch(&self, scratch: ScratchDir, succeeded: bool) -> ScratchDisposition {
        if !succeeded && self.config.keep_scratch_on_failure {
            let path = scratch.retain();
            tracing::info!("Keeping scratch directory {}", path.display());
            return ScratchDisposition::Retained { path };
        }

        let path = scratch.path().to_path_buf();
        match scratch.remove() {
            Ok(()) => ScratchDisposition::Removed,
            Err(e) => {
                tracing::warn!("{}", e);
                ScratchDisposition::Retained { path }
            }
        }
    }
}

/// Regular files under `dir`, depth first with siblings sorted by name
fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Rename `path` to `new_name` within its own folder
fn rename_in_place(path: &Path, new_name: &str) -> Result<PathBuf> {
    let target = path.with_file_name(new_name);
    if target == path {
        return Ok(target);
    }

    let failed = |source: io::Error| Error::RenameFailed {
        from: path.to_path_buf(),
        to: target.clone(),
        source,
    };

    if fs::symlink_metadata(&target).is_ok() {
        return Err(failed(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "target name already taken in scratch directory",
        )));
    }
    fs::rename(path, &target).map_err(failed)?;
    Ok(target)
}

/// Process one archive with the default configuration
#[must_use]
pub fn process_archive<P: AsRef<Path>, Q: AsRef<Path>>(archive: P, output_dir: Q) -> JobReport {
    AssetPipeline::default().process_archive(archive.as_ref(), output_dir.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
        for (name, data) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap();
    }

    fn pipeline_in(temp: &TempDir) -> AssetPipeline {
        AssetPipeline::new(RenameConfig {
            scratch_root: Some(temp.path().join("scratch")),
            ..RenameConfig::default()
        })
    }

    #[test]
    fn test_rename_in_place() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("model.obj");
        fs::write(&from, "v").unwrap();

        let renamed = rename_in_place(&from, "car.obj").unwrap();

        assert_eq!(renamed, temp.path().join("car.obj"));
        assert!(!from.exists());
        assert_eq!(rename_in_place(&renamed, "car.obj").unwrap(), renamed);
    }

    #[test]
    fn test_rename_collision_in_scratch() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("model.obj"), "a").unwrap();
        fs::write(temp.path().join("car.obj"), "b").unwrap();

        let err = rename_in_place(&temp.path().join("model.obj"), "car.obj").unwrap_err();

        assert!(matches!(err, Error::RenameFailed { .. }));
        assert_eq!(fs::read_to_string(temp.path().join("car.obj")).unwrap(), "b");
    }

    #[test]
    fn test_collect_files_sorted_and_recursive() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("b")).unwrap();
        fs::write(temp.path().join("c.txt"), "").unwrap();
        fs::write(temp.path().join("a.txt"), "").unwrap();
        fs::write(temp.path().join("b").join("z.txt"), "").unwrap();

        let files = collect_files(temp.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(temp.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![PathBuf::from("a.txt"), PathBuf::from("b/z.txt"), PathBuf::from("c.txt")]
        );
    }

    #[test]
    fn test_process_archive_reports_progress() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("car.zip");
        write_zip(
            &archive,
            &[
                ("model.obj", b"mtllib Model.mtl\n".as_slice()),
                ("model.mtl", b"map_Kd Model.jpg\n".as_slice()),
            ],
        );
        let out = temp.path().join("out");
        let phases = Mutex::new(Vec::new());

        let report = pipeline_in(&temp).process_archive_with_progress(&archive, &out, &|p: &RenameProgress| {
            phases.lock().unwrap().push(p.phase);
        });

        assert!(report.is_success(), "{}", report.outcome);
        assert_eq!(report.entries_total, 2);
        assert_eq!(report.scratch, ScratchDisposition::Removed);
        assert!(report.source_deleted);
        let phases = phases.into_inner().unwrap();
        assert_eq!(phases.first(), Some(&RenamePhase::Extracting));
        assert_eq!(phases.last(), Some(&RenamePhase::Complete));
        assert_eq!(
            phases.iter().filter(|p| **p == RenamePhase::Patching).count(),
            2
        );
    }

    #[test]
    fn test_existing_scratch_directory_fails_job() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("car.zip");
        write_zip(&archive, &[("tex.png", b"png".as_slice())]);
        fs::create_dir_all(temp.path().join("scratch").join("car")).unwrap();

        let report = pipeline_in(&temp).process_archive(&archive, &temp.path().join("out"));

        assert_eq!(report.outcome.stage(), Some(JobStage::Scratch));
        assert_eq!(report.scratch, ScratchDisposition::NotCreated);
        assert!(archive.exists());
        assert!(temp.path().join("scratch").join("car").is_dir());
    }

    #[test]
    fn test_unsafe_entry_fails_extract_and_keeps_source() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("car.zip");
        write_zip(
            &archive,
            &[
                ("model.obj", b"mtllib Model.mtl\n".as_slice()),
                ("../evil.txt", b"escaped".as_slice()),
            ],
        );
        let out = temp.path().join("out");

        let report = pipeline_in(&temp).process_archive(&archive, &out);

        assert_eq!(report.outcome.stage(), Some(JobStage::Extract));
        assert!(archive.exists());
        assert!(!report.source_deleted);
        assert_eq!(report.scratch, ScratchDisposition::Removed);
        assert!(!temp.path().join("scratch").join("evil.txt").exists());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_patch_line_still_moves() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("car.zip");
        write_zip(&archive, &[("model.obj", b"v 0 0 0\r\n".as_slice())]);
        let out = temp.path().join("out");

        let report = pipeline_in(&temp).process_archive(&archive, &out);

        assert!(report.is_success());
        assert_eq!(fs::read(out.join("car.obj")).unwrap(), b"v 0 0 0\r\n");
    }
}
