//! Directory walking implementation using walkdir.

use super::{FilenamePattern, HashListScanner, RootScan};
use crate::core::fingerprint::{Fingerprinter, PixelFingerprinter};
use crate::core::hashlist::{HashEntry, HashList};
use crate::core::pipeline::CancellationToken;
use crate::error::{HashError, ScanError};
use crate::events::{Event, EventSender, ProgressEvent, ScanEvent};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::{error, warn};
use walkdir::{DirEntry, WalkDir};

/// Matching files of one directory, in walk order
struct FolderBatch {
    folder: PathBuf,
    files: Vec<PathBuf>,
}

/// Scanner implementation using the walkdir crate.
///
/// Within a directory, files are listed before subdirectories and both are
/// visited in name order. Fingerprints of one directory are computed in
/// parallel but appended in that order.
pub struct WalkDirScanner {
    fingerprinter: Box<dyn Fingerprinter>,
}

impl WalkDirScanner {
    /// Create a scanner fingerprinting with [`PixelFingerprinter`]
    pub fn new() -> Self {
        Self::with_fingerprinter(Box::new(PixelFingerprinter::new()))
    }

    /// Create a scanner with a custom fingerprint implementation
    pub fn with_fingerprinter(fingerprinter: Box<dyn Fingerprinter>) -> Self {
        Self { fingerprinter }
    }

    /// Collect matching files grouped by directory
    fn collect_batches(
        &self,
        root: &Path,
        pattern: &FilenamePattern,
        recursive: bool,
        cancel: &CancellationToken,
        errors: &mut Vec<ScanError>,
    ) -> Vec<FolderBatch> {
        let max_depth = if recursive { usize::MAX } else { 1 };
        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by(files_before_folders);

        let mut batches: Vec<FolderBatch> = Vec::new();

        for entry_result in walker {
            if cancel.is_cancelled() {
                break;
            }

            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    warn!("Could not read {}: {}", path.display(), e);
                    errors.push(ScanError::ReadDirectory {
                        path,
                        source: e
                            .into_io_error()
                            .unwrap_or_else(|| std::io::Error::other("filesystem loop")),
                    });
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if !pattern.is_match(&entry.file_name().to_string_lossy()) {
                continue;
            }

            let folder = entry.path().parent().unwrap_or(root).to_path_buf();
            match batches.last_mut() {
                Some(batch) if batch.folder == folder => batch.files.push(entry.into_path()),
                _ => batches.push(FolderBatch {
                    folder,
                    files: vec![entry.into_path()],
                }),
            }
        }

        batches
    }

    /// Fingerprint one directory's files, preserving their order
    fn hash_batch(
        &self,
        batch: &FolderBatch,
        cancel: &CancellationToken,
        events: &EventSender,
    ) -> Vec<Option<Result<HashEntry, HashError>>> {
        events.progress(ProgressEvent::PhaseChanged {
            text: format!("{} ({}x)", batch.folder.display(), batch.files.len()),
        });
        events.progress(ProgressEvent::Indeterminate { enabled: false });
        events.progress(ProgressEvent::Bounds {
            min: 0,
            max: batch.files.len(),
            value: 0,
        });

        batch
            .files
            .par_iter()
            .map(|path| {
                if cancel.is_cancelled() {
                    return None;
                }

                let result = self.fingerprinter.fingerprint_file(path).map(|fingerprint| {
                    events.send(Event::Scan(ScanEvent::FileHashed {
                        path: path.clone(),
                        fingerprint: fingerprint.to_string(),
                    }));
                    HashEntry::new(fingerprint, path.to_string_lossy())
                });

                events.progress(ProgressEvent::Incremented);
                Some(result)
            })
            .collect()
    }
}

impl Default for WalkDirScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl HashListScanner for WalkDirScanner {
    fn scan_into(
        &self,
        list: &mut HashList,
        cancel: &CancellationToken,
        events: &EventSender,
    ) -> Result<RootScan, ScanError> {
        let root = if list.root_folder().is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(list.root_folder())
        };

        if !root.is_dir() {
            error!("Folder does not exist: {}", root.display());
            events.send(Event::Scan(ScanEvent::RootMissing { root: root.clone() }));
            return Err(ScanError::DirectoryNotFound { path: root });
        }

        let pattern = FilenamePattern::new(list.name_pattern())?;
        let root = std::path::absolute(&root).unwrap_or(root);

        events.send(Event::Scan(ScanEvent::RootStarted { root: root.clone() }));

        let mut scan = RootScan::default();
        let batches =
            self.collect_batches(&root, &pattern, list.is_recursive(), cancel, &mut scan.errors);

        for batch in &batches {
            if cancel.is_cancelled() {
                break;
            }

            for outcome in self.hash_batch(batch, cancel, events) {
                match outcome {
                    Some(Ok(entry)) => {
                        list.push(entry);
                        scan.hashed += 1;
                    }
                    Some(Err(e)) => {
                        warn!("Could not generate hash: {}", e);
                        events.send(Event::Scan(ScanEvent::FileSkipped {
                            path: hash_error_path(&e),
                            message: e.to_string(),
                        }));
                        scan.skipped.push(e);
                    }
                    None => {}
                }
            }
        }

        scan.cancelled = cancel.is_cancelled();
        Ok(scan)
    }
}

fn files_before_folders(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

fn hash_error_path(error: &HashError) -> PathBuf {
    match error {
        HashError::DecodeError { path, .. }
        | HashError::UnsupportedLayout { path, .. }
        | HashError::IoError { path, .. } => path.clone(),
    }
}
