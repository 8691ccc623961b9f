//! CLI command for a dry run over one archive

use std::path::Path;

use console::style;

use crate::config::KindTokenRule;
use crate::pipeline::plan_archive;

pub fn execute(source: &Path, config: Option<&Path>, extension_kinds: bool) -> anyhow::Result<()> {
    let mut config = super::config::load(config)?;
    if extension_kinds {
        config.kind_token = KindTokenRule::Extension;
    }

    let plan = plan_archive(source, &config)?;

    println!("{} -> {}", source.display(), style(&plan.base_name).bold());
    for entry in &plan.entries {
        let patch = entry
            .patch
            .map_or_else(String::new, |kind| format!(" (patch {kind})"));
        println!("  {} -> {}{}", entry.stored_name, entry.output_name, patch);
    }

    let collisions = plan.collisions();
    if !collisions.is_empty() {
        println!();
        println!("Collisions (only the first file of each would be moved):");
        for name in collisions {
            println!("  {}", style(name).yellow());
        }
    }

    Ok(())
}
