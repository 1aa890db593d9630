//! # Core Module
//!
//! The UI-agnostic duplicate image engine.
//!
//! ## Modules
//! - `fingerprint` - Hashes decoded pixel data of an image
//! - `hashlist` - Fingerprint/path lists and their text format
//! - `scanner` - Fills hash lists by walking root folders
//! - `comparator` - Finds duplicates within and across hash lists
//! - `reporter` - Writes the duplicate report and JSON export
//! - `pipeline` - Runs hashing and comparing as cancellable tasks

pub mod comparator;
pub mod fingerprint;
pub mod hashlist;
pub mod pipeline;
pub mod reporter;
pub mod scanner;

// Re-export commonly used types
pub use comparator::{DuplicateGroup, MatchOptions, SearchMode};
pub use fingerprint::Fingerprint;
pub use hashlist::{HashEntry, HashList};
pub use pipeline::{CancellationToken, CompareTask, HashTask};
pub use reporter::ReportLayout;
