//! # Hash List Module
//!
//! Fingerprint/path pairs gathered from one root folder, together with
//! how they were gathered (root, filename pattern, recursion).
//!
//! Hash lists are persisted as plain text (see [`format`]) so a scan can
//! be compared later, or against scans of other machines.

pub mod format;

pub use format::{read_hash_list, write_hash_list};

use crate::core::fingerprint::Fingerprint;
use serde::{Deserialize, Serialize};

/// One fingerprinted file.
///
/// `folder` and `filename` are derived once from the path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashEntry {
    fingerprint: Fingerprint,
    file: String,
    folder: String,
    filename: String,
}

impl HashEntry {
    pub fn new(fingerprint: Fingerprint, file: impl Into<String>) -> Self {
        let file = file.into();
        let (folder, filename) = split_path(&file);
        let (folder, filename) = (folder.to_string(), filename.to_string());
        Self {
            fingerprint,
            file,
            folder,
            filename,
        }
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Full path as recorded
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Directory component of the path
    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Base name of the path
    pub fn filename(&self) -> &str {
        &self.filename
    }
}

/// Split a recorded path into directory and base name.
///
/// Both `/` and `\` separate components so lists written on another
/// platform split the same way.
pub fn split_path(file: &str) -> (&str, &str) {
    match file.rfind(['/', '\\']) {
        Some(0) => (&file[..1], &file[1..]),
        Some(index) => (&file[..index], &file[index + 1..]),
        None => ("", file),
    }
}

/// Ordered fingerprint entries of one scanned root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashList {
    root_folder: String,
    name_pattern: String,
    recursive: bool,
    entries: Vec<HashEntry>,
}

impl HashList {
    /// Create an empty list for a root
    pub fn new(
        root_folder: impl Into<String>,
        name_pattern: impl Into<String>,
        recursive: bool,
    ) -> Self {
        Self {
            root_folder: root_folder.into(),
            name_pattern: name_pattern.into(),
            recursive,
            entries: Vec::new(),
        }
    }

    /// Create a list with existing entries
    pub fn with_entries(
        root_folder: impl Into<String>,
        name_pattern: impl Into<String>,
        recursive: bool,
        entries: Vec<HashEntry>,
    ) -> Self {
        Self {
            entries,
            ..Self::new(root_folder, name_pattern, recursive)
        }
    }

    pub fn root_folder(&self) -> &str {
        &self.root_folder
    }

    /// Filename pattern the root was scanned with
    pub fn name_pattern(&self) -> &str {
        &self.name_pattern
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    pub fn entries(&self) -> &[HashEntry] {
        &self.entries
    }

    /// Append an entry after all existing ones
    pub fn push(&mut self, entry: HashEntry) {
        self.entries.push(entry);
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = HashEntry>) {
        self.entries.extend(entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
