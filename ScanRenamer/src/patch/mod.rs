//! Text reference patching for OBJ/MTL files
//!
//! A renamed `.obj` still names its material library `Model.mtl`, and the
//! renamed `.mtl` still names its texture `Model.jpg`. The patcher rewrites
//! the first line that exactly matches the legacy reference so the files
//! keep resolving to each other after the rename.
//!
//! Only the matched line changes. Line terminators and the trailing newline
//! are preserved, so a file without the legacy line is left byte-for-byte
//! identical.

mod rule;

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

pub use rule::{
    LEGACY_MODEL_STEM, LEGACY_MTL_REFERENCE, LEGACY_OBJ_REFERENCE, MTL_DIFFUSE_KEYWORD,
    OBJ_MATERIAL_KEYWORD, ReferenceRule,
};

/// Result of patching a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The legacy line was found and rewritten (1-indexed line number)
    Rewritten { line: usize },
    /// No line matched; the file was not modified
    Unchanged,
}

/// Which reference a file carries, decided by its kind token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchKind {
    /// `.obj` mesh referencing its material library
    Obj,
    /// `.mtl` material referencing its diffuse texture
    Mtl,
}

impl PatchKind {
    /// Classify a kind token; anything but `.obj`/`.mtl` is not patched
    #[must_use]
    pub fn from_kind_token(token: &str) -> Option<Self> {
        match token {
            ".obj" => Some(Self::Obj),
            ".mtl" => Some(Self::Mtl),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Obj => "obj",
            Self::Mtl => "mtl",
        }
    }
}

impl fmt::Display for PatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatchKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim_start_matches('.').to_lowercase().as_str() {
            "obj" => Ok(Self::Obj),
            "mtl" => Ok(Self::Mtl),
            _ => Err(format!("Invalid kind '{s}'. Valid values: obj, mtl")),
        }
    }
}

/// Point the `mtllib Model.mtl` line of an `.obj` file at `<new_base_name>.mtl`
pub fn patch_obj_reference<P: AsRef<Path>>(path: P, new_base_name: &str) -> Result<PatchOutcome> {
    patch_reference(path, &ReferenceRule::obj_material_library(), new_base_name)
}

/// Point the `map_Kd Model.jpg` line of an `.mtl` file at `<new_base_name>.jpg`
pub fn patch_mtl_reference<P: AsRef<Path>>(path: P, new_base_name: &str) -> Result<PatchOutcome> {
    patch_reference(path, &ReferenceRule::mtl_diffuse_map(), new_base_name)
}

/// Rewrite the first line matching `rule` in the file at `path`.
///
/// # Errors
///
/// Returns [`Error::PatchRead`] if the file cannot be read or is not UTF-8.
/// Returns [`Error::PatchWrite`] if the rewritten file cannot be persisted.
///
/// [`Error::PatchRead`]: crate::Error::PatchRead
/// [`Error::PatchWrite`]: crate::Error::PatchWrite
pub fn patch_reference<P: AsRef<Path>>(
    path: P,
    rule: &ReferenceRule,
    new_base_name: &str,
) -> Result<PatchOutcome> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| Error::PatchRead {
        path: path.to_path_buf(),
        source,
    })?;

    let legacy = rule.legacy_line();
    let Some((patched, line)) =
        rewrite_first_match(&content, &legacy, &rule.replacement_line(new_base_name))
    else {
        tracing::debug!("No '{}' line in {}", legacy, path.display());
        return Ok(PatchOutcome::Unchanged);
    };

    write_atomically(path, patched.as_bytes())?;
    tracing::debug!("Patched line {} of {}", line, path.display());

    Ok(PatchOutcome::Rewritten { line })
}

/// Split `content` into `(line, terminator)` pairs.
///
/// `\r\n`, `\n` and a lone `\r` each end a line. The last line has an
/// empty terminator when the file does not end with one.
fn lines_with_terminators(content: &str) -> Vec<(&str, &str)> {
    let bytes = content.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let end = match bytes[i] {
            b'\r' if bytes.get(i + 1) == Some(&b'\n') => i + 2,
            b'\r' | b'\n' => i + 1,
            _ => {
                i += 1;
                continue;
            }
        };
        lines.push((&content[start..i], &content[i..end]));
        start = end;
        i = end;
    }
    if start < bytes.len() {
        lines.push((&content[start..], ""));
    }
    lines
}

/// Replace the first line equal to `legacy`, keeping its terminator
fn rewrite_first_match(content: &str, legacy: &str, replacement: &str) -> Option<(String, usize)> {
    let mut offset = 0;
    for (idx, (line, terminator)) in lines_with_terminators(content).into_iter().enumerate() {
        if line == legacy {
            let rest = offset + line.len();
            let mut out = String::with_capacity(content.len() + replacement.len());
            out.push_str(&content[..offset]);
            out.push_str(replacement);
            out.push_str(&content[rest..]);
            return Some((out, idx + 1));
        }
        offset += line.len() + terminator.len();
    }
    None
}

/// Write to a sibling temp file, then rename it over `path`
fn write_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    let write_err = |message: String| Error::PatchWrite {
        path: path.to_path_buf(),
        message,
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| write_err(e.to_string()))?;
    tmp.write_all(contents).map_err(|e| write_err(e.to_string()))?;
    tmp.as_file().sync_all().map_err(|e| write_err(e.to_string()))?;

    if let Ok(meta) = fs::metadata(path) {
        // Keep the original mode; the temp file is created 0600
        if let Err(e) = tmp.as_file().set_permissions(meta.permissions()) {
            tracing::debug!("Could not copy permissions onto {}: {}", path.display(), e);
        }
    }

    tmp.persist(path).map_err(|e| write_err(e.error.to_string()))?;
    Ok(())
}
