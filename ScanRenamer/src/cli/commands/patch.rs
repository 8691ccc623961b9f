//! CLI command for patching a single file

use std::ffi::OsStr;
use std::path::Path;

use crate::patch::{PatchKind, PatchOutcome, patch_reference};

pub fn execute(
    file: &Path,
    name: &str,
    kind: Option<PatchKind>,
    config: Option<&Path>,
) -> anyhow::Result<()> {
    let kind = match kind {
        Some(kind) => kind,
        None => file
            .extension()
            .and_then(OsStr::to_str)
            .and_then(|ext| ext.parse::<PatchKind>().ok())
            .ok_or_else(|| {
                anyhow::anyhow!("Cannot tell the kind of {}; pass --kind obj|mtl", file.display())
            })?,
    };
    let config = super::config::load(config)?;
    let rule = config.rule_for(kind);

    match patch_reference(file, rule, name)? {
        PatchOutcome::Rewritten { line } => {
            println!(
                "Line {line}: {} -> {}",
                rule.legacy_line(),
                rule.replacement_line(name)
            );
        }
        PatchOutcome::Unchanged => {
            println!("No '{}' line in {}; file left as is", rule.legacy_line(), file.display());
        }
    }

    Ok(())
}
