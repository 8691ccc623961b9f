//! Per-job scratch directory

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A freshly created directory owned by one job.
///
/// Dropping the guard removes the directory and everything in it. Call
/// [`ScratchDir::remove`] to observe removal errors, or
/// [`ScratchDir::retain`] to leave it on disk.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    armed: bool,
}

impl ScratchDir {
    /// Create `root/name`; it must not exist yet
    pub fn create(root: &Path, name: &str) -> Result<Self> {
        fs::create_dir_all(root).map_err(|source| Error::ScratchCreate {
            path: root.to_path_buf(),
            source,
        })?;

        let path = root.join(name);
        match fs::create_dir(&path) {
            Ok(()) => Ok(Self { path, armed: true }),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(Error::ScratchExists { path }),
            Err(source) => Err(Error::ScratchCreate { path, source }),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the directory now
    pub fn remove(mut self) -> Result<()> {
        self.armed = false;
        fs::remove_dir_all(&self.path).map_err(|source| Error::ScratchRemove {
            path: self.path.clone(),
            source,
        })
    }

    /// Keep the directory on disk and return its path
    #[must_use]
    pub fn retain(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if self.armed
            && let Err(e) = fs::remove_dir_all(&self.path)
        {
            tracing::warn!("Failed to remove scratch directory {}: {}", self.path.display(), e);
        }
    }
}
