//! Per-archive job outcomes

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Error;

/// Pipeline stage a job failed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStage {
    /// Deriving the base name from the archive path
    Prepare,
    /// Creating or walking the scratch directory
    Scratch,
    /// Extracting the archive
    Extract,
    /// Renaming an entry inside the scratch directory
    Rename,
    /// Patching an `.obj`/`.mtl` reference line
    Patch,
    /// Moving an entry into the output directory
    Move,
}

impl JobStage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Prepare => "prepare",
            Self::Scratch => "scratch",
            Self::Extract => "extract",
            Self::Rename => "rename",
            Self::Patch => "patch",
            Self::Move => "move",
        }
    }
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final state of an archive job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JobOutcome {
    /// Every entry was renamed, patched as applicable, and moved
    Success,
    /// The job stopped at `stage`; entries moved before the failure stay moved
    Failed {
        /// Stage the job failed in
        stage: JobStage,
        /// Display form of the underlying error
        cause: String,
    },
}

impl JobOutcome {
    /// Build a failed outcome from an error
    #[must_use]
    pub fn failed(stage: JobStage, error: &Error) -> Self {
        Self::Failed {
            stage,
            cause: error.to_string(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// The failed stage, if any
    #[must_use]
    pub fn stage(&self) -> Option<JobStage> {
        match self {
            Self::Success => None,
            Self::Failed { stage, .. } => Some(*stage),
        }
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Failed { stage, cause } => write!(f, "failed at {stage}: {cause}"),
        }
    }
}

/// What happened to a job's scratch directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ScratchDisposition {
    /// No scratch directory was created
    NotCreated,
    /// Removed after the job
    Removed,
    /// Left on disk, either on request or because removal failed
    Retained {
        /// Location of the scratch directory
        path: PathBuf,
    },
}

/// Everything the caller needs to know about one archive job
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    /// Archive that was processed
    pub archive: PathBuf,
    /// Base name the entries were renamed to
    pub base_name: String,
    /// Success or the failed stage
    pub outcome: JobOutcome,
    /// Files placed in the output directory, in processing order
    pub moved: Vec<PathBuf>,
    /// Number of files found after extraction
    pub entries_total: usize,
    /// Whether the source archive was deleted after extraction
    pub source_deleted: bool,
    /// Fate of the scratch directory
    pub scratch: ScratchDisposition,
}

impl JobReport {
    /// Create a report for a job that has not run yet
    #[must_use]
    pub fn new(archive: &Path, base_name: impl Into<String>) -> Self {
        Self {
            archive: archive.to_path_buf(),
            base_name: base_name.into(),
            outcome: JobOutcome::Success,
            moved: Vec::new(),
            entries_total: 0,
            source_deleted: false,
            scratch: ScratchDisposition::NotCreated,
        }
    }

    /// Mark the report failed
    #[must_use]
    pub fn failed(mut self, stage: JobStage, error: &Error) -> Self {
        self.outcome = JobOutcome::failed(stage, error);
        self
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}
