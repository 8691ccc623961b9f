//! Error types for `ScanRenamer`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `ScanRenamer` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Extraction Errors ====================
    /// The archive file could not be opened.
    #[error("failed to open archive {path}: {source}")]
    ArchiveOpen {
        /// Path to the archive.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The file is not a readable zip archive, or an entry is corrupt.
    #[error("invalid or corrupt archive {path}: {source}")]
    InvalidArchive {
        /// Path to the archive.
        path: PathBuf,
        /// Error reported by the zip reader.
        source: zip::result::ZipError,
    },

    /// An entry's stored name would resolve outside the extraction directory.
    #[error("archive entry has an unsafe path: {name}")]
    UnsafeEntryName {
        /// The stored entry name.
        name: String,
    },

    /// An extracted entry could not be written to disk.
    #[error("failed to write entry {path}: {source}")]
    EntryWrite {
        /// Destination path of the entry.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    // ==================== Patch Errors ====================
    /// A text file could not be read (or is not valid UTF-8).
    #[error("failed to read {path}: {source}")]
    PatchRead {
        /// The file being patched.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A patched text file could not be written back.
    #[error("failed to write {path}: {message}")]
    PatchWrite {
        /// The file being patched.
        path: PathBuf,
        /// The error message.
        message: String,
    },

    // ==================== Move Errors ====================
    /// The output directory already contains a file with the target name.
    #[error("destination already exists: {path}")]
    DestinationExists {
        /// The colliding destination path.
        path: PathBuf,
    },

    /// Moving a file into the output directory failed.
    #[error("failed to move {from} to {to}: {source}")]
    MoveFailed {
        /// Source path (inside the scratch directory).
        from: PathBuf,
        /// Destination path (inside the output directory).
        to: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Renaming an entry inside the scratch directory failed.
    #[error("failed to rename {from} to {to}: {source}")]
    RenameFailed {
        /// Original entry path.
        from: PathBuf,
        /// New entry path.
        to: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    // ==================== Directory Errors ====================
    /// A directory with the scratch name already exists.
    #[error("scratch directory already exists: {path}")]
    ScratchExists {
        /// The scratch directory path.
        path: PathBuf,
    },

    /// The scratch directory could not be created.
    #[error("failed to create scratch directory {path}: {source}")]
    ScratchCreate {
        /// The scratch directory path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The scratch directory could not be removed.
    #[error("failed to remove scratch directory {path}: {source}")]
    ScratchRemove {
        /// The scratch directory path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    // ==================== Configuration Errors ====================
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        /// The configuration file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The configuration file could not be parsed.
    #[error("invalid config {path}: {source}")]
    ConfigParse {
        /// The configuration file.
        path: PathBuf,
        /// TOML parse error.
        source: toml::de::Error,
    },

    /// The configuration could not be serialized.
    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    // ==================== File System Errors ====================
    /// Invalid file path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),
}

// Add conversion from walkdir::Error
impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

/// A specialized Result type for `ScanRenamer` operations.
pub type Result<T> = std::result::Result<T, Error>;
