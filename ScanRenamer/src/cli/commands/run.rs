//! CLI command for batch processing

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;

use crate::batch::{find_archive_files, process_batch};
use crate::cli::progress::{LOOKING_GLASS, PACKAGE, print_done, print_failure, print_step, simple_bar};
use crate::config::{KindTokenRule, RenameConfig};
use crate::pipeline::{RenamePhase, RenameProgress};

/// Config overrides from CLI flags
#[derive(Debug, Clone, Default)]
pub struct RunCliOptions {
    /// Config file (--config)
    pub config: Option<PathBuf>,
    /// Scratch root (--scratch-dir)
    pub scratch_dir: Option<PathBuf>,
    /// Keep source archives (--keep-source)
    pub keep_source: bool,
    /// Keep scratch of failed archives (--keep-scratch)
    pub keep_scratch: bool,
    /// Extension-based kind tokens (--extension-kinds)
    pub extension_kinds: bool,
}

impl RunCliOptions {
    /// Apply the flags on top of a loaded config
    fn apply(&self, config: &mut RenameConfig) {
        if let Some(dir) = &self.scratch_dir {
            config.scratch_root = Some(dir.clone());
        }
        if self.keep_source {
            config.delete_source = false;
        }
        if self.keep_scratch {
            config.keep_scratch_on_failure = true;
        }
        if self.extension_kinds {
            config.kind_token = KindTokenRule::Extension;
        }
    }
}

/// Progress bar label: `Processing archive car.zip`
fn progress_message(progress: &RenameProgress) -> String {
    match &progress.current_file {
        Some(name) => format!("{} {name}", progress.phase.as_str()),
        None => progress.phase.as_str().to_string(),
    }
}

pub fn execute(
    source: Option<&Path>,
    archives: &[PathBuf],
    destination: &Path,
    options: &RunCliOptions,
    show_progress: bool,
    json: bool,
) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut config = super::config::load(options.config.as_deref())?;
    options.apply(&mut config);

    let archives = match source {
        Some(dir) => find_archive_files(dir)
            .with_context(|| format!("Failed to read source folder: {}", dir.display()))?,
        None => archives.to_vec(),
    };

    if !json {
        if archives.is_empty() {
            println!("No archives to process");
        } else {
            print_step(1, 2, LOOKING_GLASS, &format!("Found {} archive(s)", archives.len()));
            print_step(2, 2, PACKAGE, &format!("Renaming into {}", destination.display()));
        }
    }

    let pb = (show_progress && !json && !archives.is_empty())
        .then(|| simple_bar(archives.len() as u64, "Processing"));

    let result = process_batch(&archives, destination, &config, |progress| {
        if let Some(pb) = &pb {
            match progress.phase {
                RenamePhase::Archive => pb.set_position(progress.current.saturating_sub(1) as u64),
                RenamePhase::Complete => pb.set_position(progress.total as u64),
                _ => return,
            }
            pb.set_message(progress_message(progress));
        }
    })
    .with_context(|| format!("Failed to create destination: {}", destination.display()))?;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!();
    println!("  Success: {}", result.success_count);
    println!("  Failed: {}", result.fail_count);

    if result.fail_count > 0 {
        println!();
        for report in result.failures() {
            let name = report
                .archive
                .file_name()
                .map_or_else(|| report.archive.display().to_string(), |n| n.to_string_lossy().to_string());
            print_failure(&name, &report.outcome.to_string());
        }
    }

    println!();
    print_done(result.status(), start.elapsed());

    Ok(())
}
