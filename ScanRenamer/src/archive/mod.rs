//! Zip archive access
//!
//! Just enough of a zip reader for the pipeline: list the entries of an
//! archive and extract all of them into a directory.

mod reader;

pub use reader::{ArchiveEntry, ArchiveReader, ExtractSummary, extract_archive, list_entries};
