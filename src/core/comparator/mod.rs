//! # Comparator Module
//!
//! Finds duplicate files across one or more hash lists.
//!
//! ## How It Works
//! 1. Pick the passes the search mode enables (within a list, across lists)
//! 2. Compare every eligible pair with the match rule
//! 3. Collect matches into one group per fingerprint (or one group per
//!    reported entry in reverse mode)
//! 4. Optionally collapse groups describing the same folders
//!
//! ## Search Modes
//! | Mode            | Within list | Across lists | Pair constraint   |
//! |-----------------|-------------|--------------|-------------------|
//! | `normal`        | yes         | yes          | none              |
//! | `inclusive`     | yes         | yes          | same folder       |
//! | `exclusive`     | yes         | yes          | different folders |
//! | `listinclusive` | yes         | no           | none              |
//! | `listexclusive` | no          | yes          | none              |

mod group;
mod matcher;
mod traits;

pub use group::{collapse_folder_groups, DuplicateGroup};
pub use matcher::{DuplicateMatcher, MatchOutcome};
pub use traits::{ExactMatchRule, MatchRule};

use crate::core::hashlist::{HashEntry, HashList};
use crate::core::reporter::ReportLayout;
use crate::error::PixelDupesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which entry pairs are compared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Every pair, within and across lists
    #[default]
    Normal,
    /// Every pass, but only pairs inside one folder
    Inclusive,
    /// Every pass, but only pairs from different folders
    Exclusive,
    /// Only pairs from the same list
    ListInclusive,
    /// Only pairs from different lists
    ListExclusive,
}

impl SearchMode {
    pub const ALL: [SearchMode; 5] = [
        SearchMode::Normal,
        SearchMode::Inclusive,
        SearchMode::Exclusive,
        SearchMode::ListInclusive,
        SearchMode::ListExclusive,
    ];

    /// Name used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            SearchMode::Normal => "normal",
            SearchMode::Inclusive => "inclusive",
            SearchMode::Exclusive => "exclusive",
            SearchMode::ListInclusive => "listinclusive",
            SearchMode::ListExclusive => "listexclusive",
        }
    }

    /// Whether entries of one list are compared with each other
    pub fn within_list(&self) -> bool {
        !matches!(self, SearchMode::ListExclusive)
    }

    /// Whether entries are compared with entries of later lists
    pub fn cross_list(&self) -> bool {
        !matches!(self, SearchMode::ListInclusive)
    }

    /// Folder constraint applied to a pair once its pass allows it
    pub fn allows_pair(&self, a: &HashEntry, b: &HashEntry) -> bool {
        match self {
            SearchMode::Inclusive => a.folder() == b.folder(),
            SearchMode::Exclusive => a.folder() != b.folder(),
            _ => true,
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchMode {
    type Err = PixelDupesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SearchMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                PixelDupesError::Config(format!(
                    "unknown search mode '{}', expected one of: normal, inclusive, exclusive, listinclusive, listexclusive",
                    s
                ))
            })
    }
}

/// Options controlling a duplicate search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOptions {
    pub search_mode: SearchMode,
    /// Report one line per source entry instead of one block per group
    pub reverse: bool,
    /// In reverse mode, only report entries without any match
    pub no_duplicates: bool,
    /// Also require identical base file names
    pub compare_filenames: bool,
    /// Report folders and collapse groups covering the same folders
    pub folders_only: bool,
    /// Root prefixes removed before comparing folders of a group
    pub baseline_folders: Vec<String>,
}

impl MatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_mode(mut self, mode: SearchMode) -> Self {
        self.search_mode = mode;
        self
    }

    pub fn reverse(mut self, enabled: bool) -> Self {
        self.reverse = enabled;
        self
    }

    pub fn no_duplicates(mut self, enabled: bool) -> Self {
        self.no_duplicates = enabled;
        self
    }

    pub fn compare_filenames(mut self, enabled: bool) -> Self {
        self.compare_filenames = enabled;
        self
    }

    pub fn folders_only(mut self, enabled: bool) -> Self {
        self.folders_only = enabled;
        self
    }

    /// Add a baseline root folder
    pub fn baseline_folder(mut self, folder: impl Into<String>) -> Self {
        self.baseline_folders.push(folder.into());
        self
    }

    pub fn baseline_folders(mut self, folders: Vec<String>) -> Self {
        self.baseline_folders = folders;
        self
    }

    /// Report layout implied by the flags.
    ///
    /// The folder listing wins over reverse mode, which then only drops
    /// the header line.
    pub fn report_layout(&self) -> ReportLayout {
        match (self.folders_only, self.reverse) {
            (true, reverse) => ReportLayout::FoldersOnly { header: !reverse },
            (false, true) => ReportLayout::Reverse,
            (false, false) => ReportLayout::Files,
        }
    }
}

/// Counts describing a finished search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub lists: usize,
    pub entries: usize,
    pub groups: usize,
    /// Files beyond the first of each group
    pub duplicate_files: usize,
    pub cancelled: bool,
}

impl MatchSummary {
    pub fn new(lists: &[HashList], outcome: &MatchOutcome) -> Self {
        Self {
            lists: lists.len(),
            entries: lists.iter().map(HashList::len).sum(),
            groups: outcome.groups.len(),
            duplicate_files: outcome.groups.iter().map(DuplicateGroup::duplicate_count).sum(),
            cancelled: outcome.cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fingerprint::Fingerprint;

    #[test]
    fn search_mode_names_round_trip() {
        for mode in SearchMode::ALL {
            assert_eq!(mode.to_string().parse::<SearchMode>().unwrap(), mode);
        }
        assert_eq!("ListExclusive".parse::<SearchMode>().unwrap(), SearchMode::ListExclusive);
    }

    #[test]
    fn unknown_search_mode_is_config_error() {
        let result = "everything".parse::<SearchMode>();
        assert!(matches!(result, Err(PixelDupesError::Config(_))));
    }

    #[test]
    fn search_mode_serializes_as_command_line_name() {
        let json = serde_json::to_string(&SearchMode::ListInclusive).unwrap();
        assert_eq!(json, "\"listinclusive\"");
    }

    #[test]
    fn search_mode_passes() {
        assert!(SearchMode::Normal.within_list() && SearchMode::Normal.cross_list());
        assert!(SearchMode::ListInclusive.within_list());
        assert!(!SearchMode::ListInclusive.cross_list());
        assert!(!SearchMode::ListExclusive.within_list());
        assert!(SearchMode::ListExclusive.cross_list());
    }

    #[test]
    fn folder_constraints() {
        let a = HashEntry::new(Fingerprint::from("H"), "/a/x.jpg");
        let b = HashEntry::new(Fingerprint::from("H"), "/a/y.jpg");
        let c = HashEntry::new(Fingerprint::from("H"), "/c/x.jpg");

        assert!(SearchMode::Inclusive.allows_pair(&a, &b));
        assert!(!SearchMode::Inclusive.allows_pair(&a, &c));
        assert!(!SearchMode::Exclusive.allows_pair(&a, &b));
        assert!(SearchMode::Exclusive.allows_pair(&a, &c));
        assert!(SearchMode::Normal.allows_pair(&a, &c));
    }

    #[test]
    fn options_builder_sets_flags() {
        let options = MatchOptions::new()
            .search_mode(SearchMode::Exclusive)
            .reverse(true)
            .no_duplicates(true)
            .compare_filenames(true)
            .baseline_folder("/mirror/one");

        assert_eq!(options.search_mode, SearchMode::Exclusive);
        assert!(options.reverse && options.no_duplicates && options.compare_filenames);
        assert!(!options.folders_only);
        assert_eq!(options.baseline_folders, vec!["/mirror/one".to_string()]);
    }

    #[test]
    fn report_layout_from_flags() {
        assert_eq!(MatchOptions::new().report_layout(), ReportLayout::Files);
        assert_eq!(MatchOptions::new().reverse(true).report_layout(), ReportLayout::Reverse);
        assert_eq!(
            MatchOptions::new().folders_only(true).report_layout(),
            ReportLayout::FoldersOnly { header: true }
        );
        assert_eq!(
            MatchOptions::new().folders_only(true).reverse(true).report_layout(),
            ReportLayout::FoldersOnly { header: false }
        );
    }
}
