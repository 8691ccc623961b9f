//! # ScanRenamer
//!
//! Batch renaming for zipped 3D scans.
//!
//! Each archive holds one scanned model: an `.obj` mesh, its `.mtl`
//! material and the textures. Inside, the files carry generic names and
//! reference each other as `Model.mtl` / `Model.jpg`. ScanRenamer extracts
//! every archive, renames its files after the archive, rewrites those
//! references and moves the results into one output folder.
//!
//! ## Quick Start
//!
//! ### One archive
//!
//! ```no_run
//! use scanrenamer::pipeline::process_archive;
//!
//! // car.zip: model.obj + model.mtl + model.jpg -> out/car.obj, out/car.mtl, out/car.jpg
//! let report = process_archive("scans/car.zip", "out/");
//! println!("{}: {}", report.base_name, report.outcome);
//! ```
//!
//! ### A whole folder
//!
//! ```no_run
//! use scanrenamer::batch::{find_archive_files, process_batch};
//! use scanrenamer::config::RenameConfig;
//! use std::path::Path;
//!
//! let archives = find_archive_files("scans/")?;
//! let result = process_batch(&archives, Path::new("out/"), &RenameConfig::default(), |_| {})?;
//! println!("{}", result.status());
//! # Ok::<(), scanrenamer::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `scanrenamer` command-line binary

pub mod archive;
pub mod batch;
pub mod config;
pub mod error;
pub mod patch;
pub mod pipeline;
pub mod utils;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};

    pub use crate::archive::{ArchiveReader, extract_archive, list_entries};
    pub use crate::batch::{BatchRenameResult, find_archive_files, process_batch};
    pub use crate::config::{KindTokenRule, RenameConfig};
    pub use crate::patch::{
        PatchKind, PatchOutcome, ReferenceRule, patch_mtl_reference, patch_obj_reference,
        patch_reference,
    };
    pub use crate::pipeline::{
        AssetPipeline, JobOutcome, JobReport, JobStage, plan_archive, process_archive,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
