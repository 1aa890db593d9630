//! # Pixel Dupes
//!
//! Finds duplicate images by the content of their decoded pixels.
//!
//! Two files count as duplicates when their pixel data hashes to the same
//! fingerprint, regardless of container format, metadata or file name.
//!
//! ## Workflow
//! 1. Hash one or more root folders into hash lists (`ImageHashes-<n>.txt`)
//! 2. Compare the lists, within and across each other
//! 3. Read the findings in `Duplicates.txt`
//!
//! ## Architecture
//! - `core` - The fingerprinting and matching engine
//! - `events` - Event-driven progress reporting
//! - `error` - Error types

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{PixelDupesError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
