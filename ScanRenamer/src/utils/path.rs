//! Path utilities

use std::path::Path;

use crate::error::{Error, Result};

/// Width of the legacy kind token (`.obj`, `.mtl`, `.png`, ...)
pub const KIND_TOKEN_WIDTH: usize = 4;

/// Normalize path separators to forward slashes (for display of archive entries)
pub fn normalize_path<P: AsRef<Path>>(path: P) -> String {
    path.as_ref().to_string_lossy().replace('\\', "/")
}

/// File name of an archive with its final extension removed.
///
/// `car.zip` becomes `car`, `scan.v2.zip` becomes `scan.v2`.
pub fn archive_base_name<P: AsRef<Path>>(archive: P) -> Result<String> {
    let archive = archive.as_ref();
    let name = archive
        .file_name()
        .ok_or_else(|| Error::InvalidPath(format!("no file name: {}", archive.display())))?;
    let name = name
        .to_str()
        .ok_or_else(|| Error::InvalidPath(format!("file name is not UTF-8: {}", archive.display())))?;
    // Everything before the last dot; `.zip` has no base name
    let stem = name.rfind('.').map_or(name, |idx| &name[..idx]);

    if stem.is_empty() {
        return Err(Error::InvalidPath(format!("empty base name: {}", archive.display())));
    }
    Ok(stem.to_string())
}

/// Last [`KIND_TOKEN_WIDTH`] characters of a file name.
///
/// Names shorter than the token width are returned whole.
pub fn fixed_width_suffix(name: &str) -> &str {
    match name.char_indices().rev().nth(KIND_TOKEN_WIDTH - 1) {
        Some((idx, _)) => &name[idx..],
        None => name,
    }
}

/// Final extension of a file name including the leading dot, or `""`.
pub fn extension_suffix(name: &str) -> &str {
    match name.rfind('.') {
        Some(0) | None => "",
        Some(idx) => &name[idx..],
    }
}
