//! CLI command for showing the effective configuration

use std::path::Path;

use anyhow::Context;

use crate::config::RenameConfig;

/// Load `path`, or the user config file, or the defaults
pub fn load(path: Option<&Path>) -> anyhow::Result<RenameConfig> {
    RenameConfig::load_or_default(path).context("Failed to load configuration")
}

pub fn execute(path: Option<&Path>) -> anyhow::Result<()> {
    let config = load(path)?;

    match (path, RenameConfig::default_path()) {
        (Some(p), _) => println!("# Loaded from {}", p.display()),
        (None, Some(p)) if p.is_file() => println!("# Loaded from {}", p.display()),
        (None, Some(p)) => println!("# Defaults ({} not found)", p.display()),
        (None, None) => println!("# Defaults"),
    }
    print!("{}", config.to_toml_string()?);

    Ok(())
}
