//! Moving renamed files into the output directory

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use crate::error::{Error, Result};

/// Move `from` to `to`, refusing to replace an existing file.
///
/// Tries a plain rename first. Across filesystems the file is copied into a
/// newly created destination and the source is removed afterwards; a source
/// that cannot be removed is left for scratch cleanup.
pub(crate) fn move_file(from: &Path, to: &Path) -> Result<()> {
    let failed = |source: io::Error| Error::MoveFailed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    if fs::symlink_metadata(to).is_ok() {
        return Err(Error::DestinationExists { path: to.to_path_buf() });
    }

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            tracing::debug!("Copying {} across devices", from.display());
            copy_new(from, to).map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => Error::DestinationExists { path: to.to_path_buf() },
                _ => failed(e),
            })?;
            if let Err(e) = fs::remove_file(from) {
                tracing::warn!("Failed to remove {} after copy: {}", from.display(), e);
            }
            Ok(())
        }
        Err(e) => Err(failed(e)),
    }
}

fn copy_new(from: &Path, to: &Path) -> io::Result<()> {
    let mut src = File::open(from)?;
    let mut dst = OpenOptions::new().write(true).create_new(true).open(to)?;
    let copied = io::copy(&mut src, &mut dst).and_then(|_| dst.sync_all());
    if copied.is_err() {
        let _ = fs::remove_file(to);
    }
    copied
}
