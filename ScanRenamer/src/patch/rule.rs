//! Reference line rules for OBJ and MTL files

use serde::{Deserialize, Serialize};

/// Base name the scanner exports every model under
pub const LEGACY_MODEL_STEM: &str = "Model";

/// Keyword of the material library line in `.obj` files
pub const OBJ_MATERIAL_KEYWORD: &str = "mtllib";

/// Keyword of the diffuse texture line in `.mtl` files
pub const MTL_DIFFUSE_KEYWORD: &str = "map_Kd";

/// Legacy `.obj` reference line (`mtllib Model.mtl`)
pub const LEGACY_OBJ_REFERENCE: &str = "mtllib Model.mtl";

/// Legacy `.mtl` reference line (`map_Kd Model.jpg`)
pub const LEGACY_MTL_REFERENCE: &str = "map_Kd Model.jpg";

/// A single reference line that names a sibling file.
///
/// The rule matches the line `<keyword> <legacy_stem><extension>` exactly and
/// rewrites it to `<keyword> <new base name><extension>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRule {
    /// Leading keyword, e.g. `mtllib`
    pub keyword: String,
    /// File stem the legacy line points at, e.g. `Model`
    pub legacy_stem: String,
    /// Extension of the referenced file including the dot, e.g. `.mtl`
    pub extension: String,
}

impl ReferenceRule {
    /// Create a new rule
    #[must_use]
    pub fn new(
        keyword: impl Into<String>,
        legacy_stem: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            legacy_stem: legacy_stem.into(),
            extension: extension.into(),
        }
    }

    /// `mtllib Model.mtl` in `.obj` files
    #[must_use]
    pub fn obj_material_library() -> Self {
        Self::new(OBJ_MATERIAL_KEYWORD, LEGACY_MODEL_STEM, ".mtl")
    }

    /// `map_Kd Model.jpg` in `.mtl` files
    #[must_use]
    pub fn mtl_diffuse_map() -> Self {
        Self::new(MTL_DIFFUSE_KEYWORD, LEGACY_MODEL_STEM, ".jpg")
    }

    /// The exact line this rule looks for
    #[must_use]
    pub fn legacy_line(&self) -> String {
        format!("{} {}{}", self.keyword, self.legacy_stem, self.extension)
    }

    /// The line that replaces the legacy line
    #[must_use]
    pub fn replacement_line(&self, base_name: &str) -> String {
        format!("{} {}{}", self.keyword, base_name, self.extension)
    }
}
