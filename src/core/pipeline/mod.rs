//! # Pipeline Module
//!
//! Runs the engines as tasks, either blocking or on a background thread.
//!
//! ## Tasks
//! 1. **Hash** - Walk each root, fingerprint its images, save the lists
//! 2. **Compare** - Search the lists for duplicates, write the report
//!
//! ## Cancellation
//! Every task owns a [`CancellationToken`]. Stopping is cooperative: the
//! engines poll the token between files and between comparisons and
//! return what they have so far, flagged as cancelled.

mod cancel;
mod executor;
mod handle;

pub use cancel::CancellationToken;
pub use executor::{
    hash_list_file_name, CompareTask, CompareTaskBuilder, CompareTaskResult, HashTask,
    HashTaskBuilder, HashTaskResult, ScanConfig,
};
pub use handle::TaskHandle;
