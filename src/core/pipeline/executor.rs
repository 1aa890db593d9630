//! Hash and compare task implementations.

use super::{CancellationToken, TaskHandle};
use crate::core::comparator::{DuplicateMatcher, MatchOptions, MatchOutcome, MatchSummary};
use crate::core::hashlist::{write_hash_list, HashList};
use crate::core::reporter::{write_report_file, DEFAULT_REPORT_FILE};
use crate::core::scanner::{FilenamePattern, HashListScanner, ScanResult, WalkDirScanner};
use crate::error::{HashListError, ReportError};
use crate::events::{EventSender, ProgressEvent};
use std::path::{Path, PathBuf};
use std::thread;
use tracing::{error, info};

/// Roots to fingerprint and how to walk them
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    pub roots: Vec<String>,
    pub pattern: FilenamePattern,
    pub recursive: bool,
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.roots.push(root.into());
        self
    }

    pub fn roots(mut self, roots: Vec<String>) -> Self {
        self.roots = roots;
        self
    }

    pub fn pattern(mut self, pattern: FilenamePattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// One empty hash list per root
    pub fn hash_lists(&self) -> Vec<HashList> {
        self.roots
            .iter()
            .map(|root| HashList::new(root.as_str(), self.pattern.as_str(), self.recursive))
            .collect()
    }
}

/// Name of the file the list at `index` is saved to
pub fn hash_list_file_name(index: usize) -> String {
    format!("ImageHashes-{}.txt", index)
}

/// Result of a [`HashTask`]
#[derive(Debug)]
pub struct HashTaskResult {
    /// Filled lists, in root order
    pub lists: Vec<HashList>,
    /// Per-root and per-file failures
    pub scan: ScanResult,
    /// Files the lists were saved to
    pub written: Vec<PathBuf>,
    /// Lists that could not be saved
    pub write_errors: Vec<HashListError>,
}

impl HashTaskResult {
    pub fn cancelled(&self) -> bool {
        self.scan.cancelled
    }
}

/// Builder for [`HashTask`]
pub struct HashTaskBuilder {
    lists: Vec<HashList>,
    output_dir: Option<PathBuf>,
    scanner: Option<Box<dyn HashListScanner>>,
}

impl HashTaskBuilder {
    pub fn new() -> Self {
        Self {
            lists: Vec::new(),
            output_dir: None,
            scanner: None,
        }
    }

    /// Add one list per configured root
    pub fn scan_config(mut self, config: &ScanConfig) -> Self {
        self.lists.extend(config.hash_lists());
        self
    }

    /// Add a prepared list
    pub fn list(mut self, list: HashList) -> Self {
        self.lists.push(list);
        self
    }

    /// Save each list as `ImageHashes-<n>.txt` in this directory
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Set the scanner (defaults to [`WalkDirScanner`])
    pub fn scanner(mut self, scanner: Box<dyn HashListScanner>) -> Self {
        self.scanner = Some(scanner);
        self
    }

    pub fn build(self) -> HashTask {
        HashTask {
            lists: self.lists,
            output_dir: self.output_dir,
            scanner: self
                .scanner
                .unwrap_or_else(|| Box::new(WalkDirScanner::new())),
            cancel: CancellationToken::new(),
        }
    }
}

impl Default for HashTaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Fills hash lists from their roots and optionally saves them
pub struct HashTask {
    lists: Vec<HashList>,
    output_dir: Option<PathBuf>,
    scanner: Box<dyn HashListScanner>,
    cancel: CancellationToken,
}

impl HashTask {
    pub fn builder() -> HashTaskBuilder {
        HashTaskBuilder::new()
    }

    /// Token stopping this task
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run on the calling thread.
    ///
    /// Lists are only saved when the scan ran to completion.
    pub fn run(self, events: &EventSender) -> HashTaskResult {
        let HashTask {
            mut lists,
            output_dir,
            scanner,
            cancel,
        } = self;

        events.progress(ProgressEvent::Indeterminate { enabled: true });
        let scan = scanner.scan_all(&mut lists, &cancel, events);

        let mut written = Vec::new();
        let mut write_errors = Vec::new();

        match output_dir {
            Some(_) if scan.cancelled => {
                info!("Hashing cancelled, hash lists are not saved");
            }
            Some(dir) => {
                for (index, list) in lists.iter().enumerate() {
                    let path = dir.join(hash_list_file_name(index));
                    match write_hash_list(list, &path) {
                        Ok(()) => written.push(path),
                        Err(e) => {
                            error!("Could not write hash list: {}", e);
                            write_errors.push(e);
                        }
                    }
                }
            }
            None => {}
        }

        events.progress(ProgressEvent::Completed);

        HashTaskResult {
            lists,
            scan,
            written,
            write_errors,
        }
    }

    /// Run on a background thread
    pub fn spawn(self, events: EventSender) -> TaskHandle<HashTaskResult> {
        let cancel = self.cancel_token();
        let join = thread::spawn(move || self.run(&events));
        TaskHandle::new(cancel, join)
    }
}

/// Result of a [`CompareTask`]
#[derive(Debug)]
pub struct CompareTaskResult {
    pub outcome: MatchOutcome,
    pub summary: MatchSummary,
    /// Groups written to the report
    pub reported: usize,
    /// The report could not be written
    pub report_error: Option<ReportError>,
}

impl CompareTaskResult {
    pub fn cancelled(&self) -> bool {
        self.outcome.cancelled
    }
}

/// Builder for [`CompareTask`]
pub struct CompareTaskBuilder {
    lists: Vec<HashList>,
    options: MatchOptions,
    report_path: Option<PathBuf>,
}

impl CompareTaskBuilder {
    pub fn new() -> Self {
        Self {
            lists: Vec::new(),
            options: MatchOptions::default(),
            report_path: Some(PathBuf::from(DEFAULT_REPORT_FILE)),
        }
    }

    pub fn lists(mut self, lists: Vec<HashList>) -> Self {
        self.lists = lists;
        self
    }

    pub fn list(mut self, list: HashList) -> Self {
        self.lists.push(list);
        self
    }

    pub fn options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Write the report here instead of `Duplicates.txt`
    pub fn report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = Some(path.into());
        self
    }

    /// Only return the groups
    pub fn no_report(mut self) -> Self {
        self.report_path = None;
        self
    }

    pub fn build(self) -> CompareTask {
        CompareTask {
            lists: self.lists,
            options: self.options,
            report_path: self.report_path,
            cancel: CancellationToken::new(),
        }
    }
}

impl Default for CompareTaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Searches hash lists for duplicates and writes the report
pub struct CompareTask {
    lists: Vec<HashList>,
    options: MatchOptions,
    report_path: Option<PathBuf>,
    cancel: CancellationToken,
}

impl CompareTask {
    pub fn builder() -> CompareTaskBuilder {
        CompareTaskBuilder::new()
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn report_path(&self) -> Option<&Path> {
        self.report_path.as_deref()
    }

    /// Run on the calling thread.
    ///
    /// A search stopped before it finished leaves an existing report
    /// untouched.
    pub fn run(&self, events: &EventSender) -> CompareTaskResult {
        let matcher = DuplicateMatcher::new(self.options.clone());
        let outcome = matcher.find_duplicates(&self.lists, &self.cancel, events);
        let summary = MatchSummary::new(&self.lists, &outcome);

        let mut reported = 0;
        let mut report_error = None;

        match &self.report_path {
            Some(_) if outcome.cancelled => {
                info!("Duplicate search cancelled, previous report is kept");
            }
            Some(path) => match write_report_file(
                path,
                &outcome.groups,
                self.options.report_layout(),
                &self.options.baseline_folders,
                &self.cancel,
            ) {
                Ok(count) => reported = count,
                Err(e) => {
                    error!("Could not write report: {}", e);
                    report_error = Some(e);
                }
            },
            None => {}
        }

        events.progress(ProgressEvent::PhaseChanged {
            text: "Done".to_string(),
        });
        events.progress(ProgressEvent::Completed);

        CompareTaskResult {
            outcome,
            summary,
            reported,
            report_error,
        }
    }

    /// Run on a background thread
    pub fn spawn(self, events: EventSender) -> TaskHandle<CompareTaskResult> {
        let cancel = self.cancel_token();
        let join = thread::spawn(move || self.run(&events));
        TaskHandle::new(cancel, join)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fingerprint::Fingerprint;
    use crate::core::hashlist::{read_hash_list, HashEntry};
    use crate::events::{null_sender, EventChannel, Event, ScanEvent};
    use image::{Rgb, RgbImage};
    use std::fs;
    use tempfile::TempDir;

    fn save_png(dir: &Path, name: &str, seed: u8) {
        RgbImage::from_pixel(3, 3, Rgb([seed, 0, 255 - seed]))
            .save_with_format(dir.join(name), image::ImageFormat::Png)
            .unwrap();
    }

    fn entry(fingerprint: &str, file: &str) -> HashEntry {
        HashEntry::new(Fingerprint::from(fingerprint), file)
    }

    #[test]
    fn scan_config_builds_one_list_per_root() {
        let config = ScanConfig::new()
            .root("/photos/")
            .root("/backup/")
            .recursive(true);

        let lists = config.hash_lists();

        assert_eq!(lists.len(), 2);
        assert_eq!(lists[1].root_folder(), "/backup/");
        assert!(lists[0].is_recursive());
        assert_eq!(lists[0].name_pattern(), FilenamePattern::default().as_str());
    }

    #[test]
    fn hash_task_saves_numbered_lists() {
        let photos = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        save_png(photos.path(), "a.png", 10);
        save_png(photos.path(), "b.png", 10);

        let config = ScanConfig::new().root(photos.path().to_string_lossy());
        let result = HashTask::builder()
            .scan_config(&config)
            .output_dir(output.path())
            .build()
            .run(&null_sender());

        assert!(!result.cancelled());
        assert_eq!(result.written, vec![output.path().join("ImageHashes-0.txt")]);

        let saved = read_hash_list(&result.written[0]).unwrap();
        assert_eq!(saved, result.lists[0]);
        assert_eq!(saved.len(), 2);
    }

    #[test]
    fn hash_task_reports_missing_root() {
        let output = TempDir::new().unwrap();
        let (sender, receiver) = EventChannel::new();

        let result = HashTask::builder()
            .scan_config(&ScanConfig::new().root("/nonexistent/path/12345"))
            .output_dir(output.path())
            .build()
            .run(&sender);
        drop(sender);

        assert_eq!(result.scan.errors.len(), 1);
        assert!(result.lists[0].is_empty());
        // An empty list is still saved
        assert_eq!(result.written.len(), 1);
        assert!(receiver
            .iter()
            .any(|e| matches!(e, Event::Scan(ScanEvent::RootMissing { .. }))));
    }

    #[test]
    fn cancelled_hash_task_saves_nothing() {
        let photos = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        save_png(photos.path(), "a.png", 1);

        let task = HashTask::builder()
            .scan_config(&ScanConfig::new().root(photos.path().to_string_lossy()))
            .output_dir(output.path())
            .build();
        task.cancel_token().cancel();
        let result = task.run(&null_sender());

        assert!(result.cancelled());
        assert!(result.written.is_empty());
        assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
    }

    #[test]
    fn compare_task_writes_report() {
        let dir = TempDir::new().unwrap();
        let report = dir.path().join("Duplicates.txt");
        let list = HashList::with_entries(
            "/",
            ".*",
            true,
            vec![entry("H1", "/a/x.jpg"), entry("H1", "/a/y.jpg"), entry("H2", "/b/z.jpg")],
        );

        let result = CompareTask::builder()
            .list(list)
            .report_path(&report)
            .build()
            .run(&null_sender());

        assert_eq!(result.reported, 1);
        assert_eq!(result.summary.groups, 1);
        assert_eq!(result.summary.entries, 3);
        assert_eq!(result.summary.duplicate_files, 1);
        assert_eq!(
            fs::read_to_string(&report).unwrap(),
            "Duplicates Found (H1): FilenameDifference!\n\t\"/a/x.jpg\"\n\t\"/a/y.jpg\"\n"
        );
    }

    #[test]
    fn compare_task_without_report_only_returns_groups() {
        let list = HashList::with_entries(
            "/",
            ".*",
            true,
            vec![entry("H1", "/a/x.jpg"), entry("H1", "/b/x.jpg")],
        );

        let task = CompareTask::builder().list(list).no_report().build();
        assert!(task.report_path().is_none());

        let result = task.run(&null_sender());
        assert_eq!(result.outcome.groups.len(), 1);
        assert_eq!(result.reported, 0);
        assert!(result.report_error.is_none());
    }

    #[test]
    fn compare_task_keeps_groups_when_report_fails() {
        let dir = TempDir::new().unwrap();
        let list = HashList::with_entries(
            "/",
            ".*",
            true,
            vec![entry("H1", "/a/x.jpg"), entry("H1", "/b/x.jpg")],
        );

        let result = CompareTask::builder()
            .list(list)
            .report_path(dir.path().join("missing").join("Duplicates.txt"))
            .build()
            .run(&null_sender());

        assert_eq!(result.outcome.groups.len(), 1);
        assert!(matches!(result.report_error, Some(ReportError::Io { .. })));
    }

    #[test]
    fn spawned_compare_task_can_be_joined() {
        let list = HashList::with_entries(
            "/",
            ".*",
            true,
            vec![entry("H1", "/a/x.jpg"), entry("H1", "/b/x.jpg")],
        );

        let handle = CompareTask::builder()
            .list(list)
            .no_report()
            .build()
            .spawn(null_sender());
        let result = handle.join();

        assert!(!result.cancelled());
        assert_eq!(result.summary.groups, 1);
    }

    #[test]
    fn stopped_compare_task_is_cancelled() {
        let list = HashList::with_entries(
            "/",
            ".*",
            true,
            vec![entry("H1", "/a/x.jpg"), entry("H1", "/b/x.jpg")],
        );

        let task = CompareTask::builder().list(list).no_report().build();
        task.cancel_token().cancel();
        let result = task.spawn(null_sender()).join();

        assert!(result.cancelled());
        assert!(result.summary.cancelled);
    }

    #[test]
    fn cancelled_search_keeps_previous_report() {
        let dir = TempDir::new().unwrap();
        let report = dir.path().join("Duplicates.txt");
        fs::write(&report, "H0\t/old/report.jpg\n").unwrap();
        let list = HashList::with_entries(
            "/",
            ".*",
            true,
            vec![entry("H1", "/a/x.jpg"), entry("H1", "/b/x.jpg")],
        );

        let task = CompareTask::builder().list(list).report_path(&report).build();
        task.cancel_token().cancel();
        let result = task.run(&null_sender());

        assert!(result.cancelled());
        assert_eq!(result.reported, 0);
        assert!(result.report_error.is_none());
        assert_eq!(fs::read_to_string(&report).unwrap(), "H0\t/old/report.jpg\n");
    }
}
