//! Rename configuration
//!
//! Every knob defaults to the behaviour the tool has always had, so an empty
//! or missing config file changes nothing. A config file is plain TOML:
//!
//! ```toml
//! kind_token = "fixed-width"      # or "extension"
//! delete_source = true
//! keep_scratch_on_failure = false
//! scratch_root = "/tmp/scanrenamer"
//!
//! [obj_reference]
//! keyword = "mtllib"
//! legacy_stem = "Model"
//! extension = ".mtl"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::patch::{PatchKind, ReferenceRule};
use crate::utils::{extension_suffix, fixed_width_suffix};

/// Default size of the per-job extraction copy buffer
pub const DEFAULT_COPY_BUFFER_SIZE: usize = 8 * 1024;

/// How the kind token of an extracted file is derived from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KindTokenRule {
    /// Last four characters of the name (`model.obj` -> `.obj`, `tex.jpeg` -> `jpeg`)
    #[default]
    FixedWidth,
    /// Final extension including the dot (`tex.jpeg` -> `.jpeg`, `README` -> empty)
    Extension,
}

impl KindTokenRule {
    /// Derive the kind token of `file_name`
    #[must_use]
    pub fn token<'a>(&self, file_name: &'a str) -> &'a str {
        match self {
            Self::FixedWidth => fixed_width_suffix(file_name),
            Self::Extension => extension_suffix(file_name),
        }
    }
}

/// Settings for the extract-rename-patch pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameConfig {
    /// Kind token derivation
    pub kind_token: KindTokenRule,
    /// Directory scratch folders are created in (current directory if unset)
    pub scratch_root: Option<PathBuf>,
    /// Delete the source archive once it has been extracted
    pub delete_source: bool,
    /// Leave the scratch folder of a failed job on disk for inspection
    pub keep_scratch_on_failure: bool,
    /// Size of the extraction copy buffer in bytes
    pub copy_buffer_size: usize,
    // Tables go last so the TOML output stays valid
    /// Reference rewritten inside `.obj` files
    pub obj_reference: ReferenceRule,
    /// Reference rewritten inside `.mtl` files
    pub mtl_reference: ReferenceRule,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            kind_token: KindTokenRule::default(),
            scratch_root: None,
            delete_source: true,
            keep_scratch_on_failure: false,
            copy_buffer_size: DEFAULT_COPY_BUFFER_SIZE,
            obj_reference: ReferenceRule::obj_material_library(),
            mtl_reference: ReferenceRule::mtl_diffuse_map(),
        }
    }
}

impl RenameConfig {
    /// Get the default config file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ScanRenamer").join("config.toml"))
    }

    /// Load a config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `explicit` if given, else the default config file if it exists,
    /// else the built-in defaults
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!("Using config {}", path.display());
                Self::load(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Parse config from a TOML string
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize config to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Directory scratch folders are created in
    #[must_use]
    pub fn scratch_root(&self) -> PathBuf {
        self.scratch_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// The reference rule applied to files of `kind`
    #[must_use]
    pub fn rule_for(&self, kind: PatchKind) -> &ReferenceRule {
        match kind {
            PatchKind::Obj => &self.obj_reference,
            PatchKind::Mtl => &self.mtl_reference,
        }
    }
}
