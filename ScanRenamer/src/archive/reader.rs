//! Zip archive reader

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use zip::ZipArchive;
use zip::result::ZipError;

use crate::config::DEFAULT_COPY_BUFFER_SIZE;
use crate::error::{Error, Result};

/// A single entry of an archive, as listed without extracting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Stored name inside the archive
    pub name: String,
    /// Uncompressed size in bytes
    pub size: u64,
    /// Whether the entry is a directory
    pub is_dir: bool,
}

/// Summary of an extraction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Number of regular files written
    pub files_extracted: usize,
    /// Number of directory entries created
    pub directories_created: usize,
    /// Total bytes written
    pub bytes_written: u64,
}

/// Extracts zip archives through a reusable copy buffer.
///
/// The buffer belongs to the reader, so one reader per job keeps jobs free
/// of shared state.
#[derive(Debug)]
pub struct ArchiveReader {
    buffer: Vec<u8>,
}

impl Default for ArchiveReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveReader {
    /// Create a reader with the default buffer size
    #[must_use]
    pub fn new() -> Self {
        Self::with_buffer_size(DEFAULT_COPY_BUFFER_SIZE)
    }

    /// Create a reader with a specific buffer size (at least one byte)
    #[must_use]
    pub fn with_buffer_size(size: usize) -> Self {
        Self {
            buffer: vec![0; size.max(1)],
        }
    }

    /// Extract every entry of `archive_path` into `dest_dir`.
    ///
    /// Entries are written in archive order under their stored names; parent
    /// directories are created as needed and a later entry with the same name
    /// overwrites an earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArchiveOpen`] if the archive cannot be opened.
    /// Returns [`Error::InvalidArchive`] if it is not a zip file or an entry is corrupt.
    /// Returns [`Error::UnsafeEntryName`] if an entry would land outside `dest_dir`.
    /// Returns [`Error::EntryWrite`] if a destination file cannot be written.
    ///
    /// [`Error::ArchiveOpen`]: crate::Error::ArchiveOpen
    /// [`Error::InvalidArchive`]: crate::Error::InvalidArchive
    /// [`Error::UnsafeEntryName`]: crate::Error::UnsafeEntryName
    /// [`Error::EntryWrite`]: crate::Error::EntryWrite
    pub fn extract<P: AsRef<Path>, Q: AsRef<Path>>(
        &mut self,
        archive_path: P,
        dest_dir: Q,
    ) -> Result<ExtractSummary> {
        let archive_path = archive_path.as_ref();
        let dest_dir = dest_dir.as_ref();
        let invalid = |source: ZipError| Error::InvalidArchive {
            path: archive_path.to_path_buf(),
            source,
        };

        let mut archive = open_archive(archive_path)?;
        fs::create_dir_all(dest_dir).map_err(|source| Error::EntryWrite {
            path: dest_dir.to_path_buf(),
            source,
        })?;

        let mut summary = ExtractSummary::default();

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(invalid)?;
            let relative = entry.enclosed_name().ok_or_else(|| Error::UnsafeEntryName {
                name: entry.name().to_string(),
            })?;
            let output_path = dest_dir.join(relative);

            if entry.is_dir() {
                fs::create_dir_all(&output_path).map_err(|source| Error::EntryWrite {
                    path: output_path.clone(),
                    source,
                })?;
                summary.directories_created += 1;
                continue;
            }

            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent).map_err(|source| Error::EntryWrite {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }

            let mut outfile = File::create(&output_path).map_err(|source| Error::EntryWrite {
                path: output_path.clone(),
                source,
            })?;

            let written = self
                .copy_entry(&mut entry, &mut outfile)
                .map_err(|e| match e {
                    CopyError::Read(e) => invalid(ZipError::Io(e)),
                    CopyError::Write(source) => Error::EntryWrite {
                        path: output_path.clone(),
                        source,
                    },
                })?;

            tracing::debug!("Extracted {} ({} bytes)", entry.name(), written);
            summary.files_extracted += 1;
            summary.bytes_written += written;
        }

        Ok(summary)
    }

    /// Stream one entry through the buffer
    fn copy_entry<R: Read, W: Write>(
        &mut self,
        reader: &mut R,
        writer: &mut W,
    ) -> std::result::Result<u64, CopyError> {
        let mut written = 0u64;
        loop {
            let n = match reader.read(&mut self.buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(CopyError::Read(e)),
            };
            writer
                .write_all(&self.buffer[..n])
                .map_err(CopyError::Write)?;
            written += n as u64;
        }
        writer.flush().map_err(CopyError::Write)?;
        Ok(written)
    }
}

/// Which side of the copy failed
enum CopyError {
    Read(io::Error),
    Write(io::Error),
}

fn open_archive(archive_path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(archive_path).map_err(|source| Error::ArchiveOpen {
        path: archive_path.to_path_buf(),
        source,
    })?;
    ZipArchive::new(file).map_err(|source| Error::InvalidArchive {
        path: archive_path.to_path_buf(),
        source,
    })
}

/// Extract an archive with a fresh [`ArchiveReader`]
pub fn extract_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    dest_dir: Q,
) -> Result<ExtractSummary> {
    ArchiveReader::new().extract(archive_path, dest_dir)
}

/// List the entries of an archive in archive order
pub fn list_entries<P: AsRef<Path>>(archive_path: P) -> Result<Vec<ArchiveEntry>> {
    let archive_path = archive_path.as_ref();
    let mut archive = open_archive(archive_path)?;

    (0..archive.len())
        .map(|i| {
            let entry = archive.by_index(i).map_err(|source| Error::InvalidArchive {
                path: archive_path.to_path_buf(),
                source,
            })?;
            Ok(ArchiveEntry {
                name: entry.name().to_string(),
                size: entry.size(),
                is_dir: entry.is_dir(),
            })
        })
        .collect()
}
