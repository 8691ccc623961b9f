//! Types for pipeline progress tracking

/// Progress callback type for pipeline operations
pub type ProgressCallback<'a> = &'a (dyn Fn(&RenameProgress) + Sync + Send);

/// Progress information during pipeline operations
#[derive(Debug, Clone)]
pub struct RenameProgress {
    /// Current operation phase
    pub phase: RenamePhase,
    /// Current item number (1-indexed)
    pub current: usize,
    /// Total number of items
    pub total: usize,
    /// Current file being processed (if applicable)
    pub current_file: Option<String>,
}

impl RenameProgress {
    /// Create a new progress update
    #[must_use]
    pub fn new(phase: RenamePhase, current: usize, total: usize) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: None,
        }
    }

    /// Create a progress update with a file/item name
    #[must_use]
    pub fn with_file(phase: RenamePhase, current: usize, total: usize, file: impl Into<String>) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: Some(file.into()),
        }
    }
}

/// Phase of a pipeline operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenamePhase {
    /// Starting the next archive of a batch (`current`/`total` count archives)
    Archive,
    /// Extracting the archive into its scratch directory
    Extracting,
    /// Renaming an extracted entry (`current`/`total` count entries)
    Renaming,
    /// Rewriting the reference line of an `.obj`/`.mtl` entry
    Patching,
    /// Moving an entry into the output directory
    Moving,
    /// Removing the scratch directory
    Cleanup,
    /// Operation complete
    Complete,
}

impl RenamePhase {
    /// Get a human-readable description of this phase
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Archive => "Processing archive",
            Self::Extracting => "Extracting",
            Self::Renaming => "Renaming",
            Self::Patching => "Patching references",
            Self::Moving => "Moving",
            Self::Cleanup => "Cleaning up",
            Self::Complete => "Complete",
        }
    }
}
