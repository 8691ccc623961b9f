use clap::Subcommand;
use std::path::PathBuf;

use crate::patch::PatchKind;

pub mod config;
pub mod patch;
pub mod plan;
pub mod run;

#[derive(Subcommand)]
pub enum Commands {
    /// Extract, rename and patch archives into a destination folder
    Run {
        /// Folder whose .zip files are processed
        #[arg(short, long, required_unless_present = "archive", conflicts_with = "archive")]
        source: Option<PathBuf>,

        /// Individual archive to process (repeatable)
        #[arg(short, long)]
        archive: Vec<PathBuf>,

        /// Output folder for renamed files
        #[arg(short, long)]
        destination: PathBuf,

        /// Config file (defaults to the user config file if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Folder scratch directories are created in
        #[arg(long)]
        scratch_dir: Option<PathBuf>,

        /// Keep source archives after extraction
        #[arg(long)]
        keep_source: bool,

        /// Keep the scratch directory of failed archives
        #[arg(long)]
        keep_scratch: bool,

        /// Use the real file extension as kind token instead of the last 4 characters
        #[arg(long)]
        extension_kinds: bool,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,

        /// Print the batch report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show what an archive would be renamed to without extracting it
    Plan {
        /// Source archive
        #[arg(short, long)]
        source: PathBuf,

        /// Config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Use the real file extension as kind token
        #[arg(long)]
        extension_kinds: bool,
    },

    /// Rewrite the reference line of a single .obj or .mtl file
    Patch {
        /// File to patch
        #[arg(short, long)]
        file: PathBuf,

        /// New base name the reference should point at
        #[arg(short, long)]
        name: String,

        /// Reference kind (obj or mtl); guessed from the file extension if omitted
        #[arg(short, long)]
        kind: Option<PatchKind>,

        /// Config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Config file to load instead of the default location
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Run {
                source,
                archive,
                destination,
                config,
                scratch_dir,
                keep_source,
                keep_scratch,
                extension_kinds,
                quiet,
                json,
            } => run::execute(
                source.as_deref(),
                archive,
                destination,
                &run::RunCliOptions {
                    config: config.clone(),
                    scratch_dir: scratch_dir.clone(),
                    keep_source: *keep_source,
                    keep_scratch: *keep_scratch,
                    extension_kinds: *extension_kinds,
                },
                !*quiet,
                *json,
            ),
            Commands::Plan {
                source,
                config,
                extension_kinds,
            } => plan::execute(source, config.as_deref(), *extension_kinds),
            Commands::Patch {
                file,
                name,
                kind,
                config,
            } => patch::execute(file, name, *kind, config.as_deref()),
            Commands::Config { path } => config::execute(path.as_deref()),
        }
    }
}
