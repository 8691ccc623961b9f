//! Utility functions

pub mod path;

pub use path::{archive_base_name, extension_suffix, fixed_width_suffix, normalize_path};
