//! # Reporter Module
//!
//! Renders duplicate groups for people and for other programs.
//!
//! ## Outputs
//! 1. **Text report**: the `Duplicates.txt` layout, one block per group
//! 2. **JSON export**: groups plus their folder and filename annotations
//!
//! ## Text Layouts
//! ```text
//! Duplicates Found (<fingerprint>): RelativeFolderDifference! FilenameDifference!
//! 	"/photos/a/x.jpg"
//! 	"/backup/b/y.jpg"
//! ```
//! Folder layouts list `\t<folder>` lines instead of files; the reverse
//! layout writes a single `<fingerprint>\t<file>` line per group.

mod export;
mod text;

pub use export::{export_json, export_json_file};
pub use text::{write_report, write_report_file, DEFAULT_REPORT_FILE};

use crate::core::comparator::DuplicateGroup;
use serde::{Deserialize, Serialize};

/// How groups are rendered in the text report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportLayout {
    /// Header plus one quoted line per file
    Files,
    /// One line per folder, optionally below the header
    FoldersOnly { header: bool },
    /// One `<fingerprint>\t<file>` line per group
    Reverse,
}

/// A duplicate group together with its report annotations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupReport {
    pub fingerprint: String,
    pub files: Vec<String>,
    pub folders: Vec<String>,
    /// All files sit in the same folder once baselines are removed
    pub same_relative_folder: bool,
    /// All files share one base name
    pub same_filename: bool,
}

impl GroupReport {
    pub fn new(group: &DuplicateGroup, baselines: &[String]) -> Self {
        Self {
            fingerprint: group.fingerprint().to_string(),
            files: group.files().to_vec(),
            folders: group.folders().to_vec(),
            same_relative_folder: group.is_same_relative_folder(baselines),
            same_filename: group.is_same_filename(),
        }
    }
}
