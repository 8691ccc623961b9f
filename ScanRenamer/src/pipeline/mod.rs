//! The extract-rename-patch-relocate pipeline
//!
//! One [`ArchiveJob`] per archive: extract into a scratch directory, rename
//! each file after the archive, patch `.obj`/`.mtl` references, move the
//! results into the output directory and report how far it got.

mod asset;
pub mod job;
pub mod outcome;
mod relocate;
pub mod scratch;
pub mod types;

pub use asset::{AssetPipeline, process_archive};
pub use job::{ArchiveJob, ArchivePlan, PlannedEntry, plan_archive};
pub use outcome::{JobOutcome, JobReport, JobStage, ScratchDisposition};
pub use scratch::ScratchDir;
pub use types::{ProgressCallback, RenamePhase, RenameProgress};
