//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the hashing and matching engines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Generic progress-bar updates
    Progress(ProgressEvent),
    /// Directory scan and fingerprinting events
    Scan(ScanEvent),
    /// Duplicate matching events
    Compare(CompareEvent),
}

/// Progress updates in the vocabulary of a progress bar.
///
/// The engines only ever emit these; nothing is read back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProgressEvent {
    /// The text describing the current phase changed
    PhaseChanged { text: String },
    /// Switch between indeterminate and determinate display
    Indeterminate { enabled: bool },
    /// New bounds together with the current value
    Bounds { min: usize, max: usize, value: usize },
    /// Current value within the last bounds
    Value { value: usize },
    /// Advance the current value by one
    Incremented,
    /// The operation has finished
    Completed,
}

/// Events during directory scanning and fingerprinting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Scanning of a root has started
    RootStarted { root: PathBuf },
    /// A root folder does not exist and was skipped
    RootMissing { root: PathBuf },
    /// A file was fingerprinted
    FileHashed { path: PathBuf, fingerprint: String },
    /// A file could not be fingerprinted and was skipped
    FileSkipped { path: PathBuf, message: String },
    /// Scanning of all roots completed
    Completed { lists: usize, total_entries: usize },
}

/// Events during duplicate matching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CompareEvent {
    /// Matching has started
    Started { lists: usize, total_entries: usize },
    /// A new duplicate group was created
    DuplicateFound { fingerprint: String },
    /// Matching completed
    Completed { total_groups: usize, cancelled: bool },
}
