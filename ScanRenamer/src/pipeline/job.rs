//! Archive jobs and dry-run planning

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::archive::list_entries;
use crate::config::{KindTokenRule, RenameConfig};
use crate::error::Result;
use crate::patch::PatchKind;
use crate::utils::{archive_base_name, normalize_path};

/// One archive to process and the base name its entries are renamed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveJob {
    /// Path of the source archive
    pub archive: PathBuf,
    /// Archive file name without its final extension
    pub base_name: String,
}

impl ArchiveJob {
    /// Create a job for `archive`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if no base name can be derived.
    ///
    /// [`Error::InvalidPath`]: crate::Error::InvalidPath
    pub fn new<P: AsRef<Path>>(archive: P) -> Result<Self> {
        let archive = archive.as_ref();
        Ok(Self {
            archive: archive.to_path_buf(),
            base_name: archive_base_name(archive)?,
        })
    }

    /// Name an extracted file ends up with: `<base name><kind token>`
    #[must_use]
    pub fn output_name(&self, file_name: &str, rule: KindTokenRule) -> String {
        format!("{}{}", self.base_name, rule.token(file_name))
    }
}

/// Planned outcome for one stored file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedEntry {
    /// Stored name inside the archive
    pub stored_name: String,
    /// Name in the output directory
    pub output_name: String,
    /// Reference patch applied to the renamed file
    pub patch: Option<PatchKind>,
}

/// Dry-run result for an archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchivePlan {
    pub archive: PathBuf,
    pub base_name: String,
    /// File entries in processing order
    pub entries: Vec<PlannedEntry>,
}

impl ArchivePlan {
    /// Output names claimed by more than one entry, sorted
    ///
    /// Only the first of these would be moved; the next one fails the job
    /// at the move stage.
    #[must_use]
    pub fn collisions(&self) -> Vec<&str> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for entry in &self.entries {
            *counts.entry(entry.output_name.as_str()).or_default() += 1;
        }

        let mut names: Vec<&str> = counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(name, _)| name)
            .collect();
        names.sort_unstable();
        names
    }
}

/// Work out what processing `archive` would produce without extracting it.
///
/// Entries are ordered the way the pipeline visits them after extraction:
/// depth first, siblings by name.
///
/// # Errors
///
/// Returns an error if the base name cannot be derived or the archive
/// cannot be listed.
pub fn plan_archive<P: AsRef<Path>>(archive: P, config: &RenameConfig) -> Result<ArchivePlan> {
    let job = ArchiveJob::new(archive)?;
    let mut stored: Vec<String> = list_entries(&job.archive)?
        .into_iter()
        .filter(|entry| !entry.is_dir)
        .map(|entry| normalize_path(&entry.name))
        .collect();
    stored.sort_by(|a, b| a.split('/').cmp(b.split('/')));
    // Later duplicates overwrite earlier ones on extraction
    stored.dedup();

    let entries = stored
        .into_iter()
        .map(|stored_name| {
            let file_name = stored_name.rsplit('/').next().unwrap_or(&stored_name);
            let output_name = job.output_name(file_name, config.kind_token);
            let patch = PatchKind::from_kind_token(config.kind_token.token(file_name));
            PlannedEntry {
                stored_name,
                output_name,
                patch,
            }
        })
        .collect();

    Ok(ArchivePlan {
        archive: job.archive,
        base_name: job.base_name,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, names: &[&str]) {
        let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
        for name in names {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(b"x").unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_job_base_name() {
        let job = ArchiveJob::new("scans/car.v2.zip").unwrap();
        assert_eq!(job.base_name, "car.v2");
        assert_eq!(job.output_name("model.obj", KindTokenRule::FixedWidth), "car.v2.obj");
        assert_eq!(job.output_name("tex.jpeg", KindTokenRule::FixedWidth), "car.v2jpeg");
        assert_eq!(job.output_name("tex.jpeg", KindTokenRule::Extension), "car.v2.jpeg");
    }

    #[test]
    fn test_plan_orders_and_marks_patches() {
        let temp = TempDir::new().unwrap();
        let zip_path = temp.path().join("car.zip");
        write_zip(&zip_path, &["model.obj", "tex/b.png", "model.mtl", "a.jpg"]);

        let plan = plan_archive(&zip_path, &RenameConfig::default()).unwrap();
        let summary: Vec<(&str, &str, Option<PatchKind>)> = plan
            .entries
            .iter()
            .map(|e| (e.stored_name.as_str(), e.output_name.as_str(), e.patch))
            .collect();

        assert_eq!(plan.base_name, "car");
        assert_eq!(
            summary,
            vec![
                ("a.jpg", "car.jpg", None),
                ("model.mtl", "car.mtl", Some(PatchKind::Mtl)),
                ("model.obj", "car.obj", Some(PatchKind::Obj)),
                ("tex/b.png", "car.png", None),
            ]
        );
        assert!(plan.collisions().is_empty());
    }

    #[test]
    fn test_plan_reports_collisions() {
        let temp = TempDir::new().unwrap();
        let zip_path = temp.path().join("car.zip");
        write_zip(&zip_path, &["a.png", "b.png", "model.obj"]);

        let plan = plan_archive(&zip_path, &RenameConfig::default()).unwrap();

        assert_eq!(plan.collisions(), vec!["car.png"]);
    }
}
