//! # Scanner Module
//!
//! Walks root folders and fills hash lists with the fingerprints of the
//! matching files.
//!
//! ## Rules
//! - A missing root is logged and contributes no entries
//! - File names are matched case-insensitively against the list's pattern
//! - Non-recursive lists only look at the root's own files
//! - Files that cannot be fingerprinted are logged and skipped
//!
//! ## Example
//! ```rust,ignore
//! use pixel_dupes::core::scanner::{HashListScanner, WalkDirScanner};
//!
//! let mut lists = vec![HashList::new("/photos/", DEFAULT_FILENAME_PATTERN, true)];
//! let result = WalkDirScanner::new().scan_all(&mut lists, &token, &events);
//! ```

mod filter;
mod walker;

pub use filter::{translate_filter, FilenamePattern, DEFAULT_FILENAME_PATTERN};
pub use walker::WalkDirScanner;

use crate::core::hashlist::HashList;
use crate::core::pipeline::CancellationToken;
use crate::error::{HashError, ScanError};
use crate::events::{Event, EventSender, ScanEvent};

/// Outcome of scanning one root
#[derive(Debug, Default)]
pub struct RootScan {
    /// Entries appended to the list
    pub hashed: usize,
    /// Files that matched the pattern but could not be fingerprinted
    pub skipped: Vec<HashError>,
    /// Non-fatal walk errors (unreadable subdirectories)
    pub errors: Vec<ScanError>,
    /// The token was cancelled before the root was finished
    pub cancelled: bool,
}

/// Outcome of scanning several roots
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Roots that could not be scanned, plus walk errors
    pub errors: Vec<ScanError>,
    /// Files that could not be fingerprinted
    pub skipped: Vec<HashError>,
    /// Scanning stopped early
    pub cancelled: bool,
}

/// Trait for hash list producers
///
/// Implement this trait to create custom scanners (e.g., for testing).
pub trait HashListScanner: Send + Sync {
    /// Append the fingerprints found under `list`'s root to `list`.
    ///
    /// Fails only for a missing root or an invalid pattern.
    fn scan_into(
        &self,
        list: &mut HashList,
        cancel: &CancellationToken,
        events: &EventSender,
    ) -> Result<RootScan, ScanError>;

    /// Scan every list in turn, collecting per-root failures
    fn scan_all(
        &self,
        lists: &mut [HashList],
        cancel: &CancellationToken,
        events: &EventSender,
    ) -> ScanResult {
        let mut result = ScanResult::default();

        for list in lists.iter_mut() {
            if cancel.is_cancelled() {
                result.cancelled = true;
                break;
            }

            match self.scan_into(list, cancel, events) {
                Ok(scan) => {
                    result.skipped.extend(scan.skipped);
                    result.errors.extend(scan.errors);
                    if scan.cancelled {
                        result.cancelled = true;
                        break;
                    }
                }
                Err(e) => result.errors.push(e),
            }
        }

        events.send(Event::Scan(ScanEvent::Completed {
            lists: lists.len(),
            total_entries: lists.iter().map(HashList::len).sum(),
        }));

        result
    }
}
