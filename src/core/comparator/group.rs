//! Duplicate groups and the folder-level collapse pass.

use crate::core::fingerprint::Fingerprint;
use crate::core::hashlist::split_path;
use serde::{Deserialize, Serialize};

const SEPARATORS: [char; 2] = ['/', '\\'];

/// Files sharing one fingerprint.
///
/// In reverse mode a group instead stands for a single source entry.
/// `files` never repeats a path and keeps first-seen order; `folders`
/// holds each containing directory once, sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    fingerprint: Fingerprint,
    files: Vec<String>,
    folders: Vec<String>,
}

impl DuplicateGroup {
    /// Create a group seeded with its first file
    pub fn new(fingerprint: Fingerprint, file: impl Into<String>) -> Self {
        let file = file.into();
        let folder = split_path(&file).0.to_string();
        Self {
            fingerprint,
            files: vec![file],
            folders: vec![folder],
        }
    }

    /// Append a file unless it is already present.
    ///
    /// Returns `true` if the file was added.
    pub fn add_file(&mut self, file: &str) -> bool {
        if self.files.iter().any(|existing| existing == file) {
            return false;
        }

        let folder = split_path(file).0;
        if let Err(position) = self.folders.binary_search_by(|f| f.as_str().cmp(folder)) {
            self.folders.insert(position, folder.to_string());
        }
        self.files.push(file.to_string());
        true
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn folders(&self) -> &[String] {
        &self.folders
    }

    /// Get the number of duplicates (excluding the first file)
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Check whether all files sit in the same folder relative to the
    /// given baseline roots.
    ///
    /// Each file's folder has the first matching baseline stripped before
    /// the folders are compared.
    pub fn is_same_relative_folder(&self, baselines: &[String]) -> bool {
        let mut folders = self
            .files
            .iter()
            .map(|file| relative_folder(split_path(file).0, baselines));

        match folders.next() {
            Some(first) => folders.all(|folder| folder == first),
            None => false,
        }
    }

    /// Check whether all files share one base name
    pub fn is_same_filename(&self) -> bool {
        let mut names = self.files.iter().map(|file| split_path(file).1);

        match names.next() {
            Some(first) => names.all(|name| name == first),
            None => false,
        }
    }

    /// Check whether every folder of `other` is also a folder of this group
    pub fn covers_folders(&self, other: &DuplicateGroup) -> bool {
        other
            .folders
            .iter()
            .all(|folder| self.folders.binary_search(folder).is_ok())
    }
}

fn relative_folder<'a>(folder: &'a str, baselines: &[String]) -> &'a str {
    for baseline in baselines {
        let baseline = baseline.trim_end_matches(SEPARATORS);
        if baseline.is_empty() {
            continue;
        }

        if let Some(rest) = folder.strip_prefix(baseline) {
            if rest.is_empty() || rest.starts_with(SEPARATORS) {
                return rest.trim_start_matches(SEPARATORS);
            }
        }
    }
    folder
}

/// Drop groups whose folders are already described by another group.
///
/// A group is dropped when another group's folder set is a strict
/// superset of its own, or is the same set and came earlier. The
/// survivors keep their relative order.
pub fn collapse_folder_groups(groups: Vec<DuplicateGroup>) -> Vec<DuplicateGroup> {
    let keep: Vec<bool> = (0..groups.len())
        .map(|b| {
            !groups.iter().enumerate().any(|(a, group)| {
                a != b
                    && group.covers_folders(&groups[b])
                    && (a < b || !groups[b].covers_folders(group))
            })
        })
        .collect();

    groups
        .into_iter()
        .zip(keep)
        .filter_map(|(group, keep)| keep.then_some(group))
        .collect()
}
