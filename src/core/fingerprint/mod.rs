//! # Fingerprint Module
//!
//! Derives a content fingerprint from an image's decoded pixel data.
//!
//! ## How It Works
//! 1. Decode the file (format detected from content, not extension)
//! 2. Take the raw sample storage, without headers or compression framing
//! 3. Serialize wider-than-8-bit samples in big-endian order
//! 4. MD5 the bytes and hex-encode the 16-byte digest
//!
//! Two files with the same pixels produce the same fingerprint even when
//! their containers or compression differ. There is no similarity
//! metric: fingerprints are equal or they are not.
//!
//! ## Example
//! ```rust,ignore
//! use pixel_dupes::core::fingerprint::{Fingerprinter, PixelFingerprinter};
//!
//! let fingerprint = PixelFingerprinter::new().fingerprint_file(&path)?;
//! println!("{}", fingerprint);
//! ```

mod samples;

pub use samples::Samples;

use crate::error::HashError;
use image::{DynamicImage, ImageError, ImageReader};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::path::Path;
use tracing::warn;

/// Hex-encoded 128-bit pixel digest.
///
/// Fingerprints loaded from hash lists are kept verbatim, so equality is
/// exact string equality of the encoded digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Encode a raw digest
    pub fn from_digest(digest: &[u8]) -> Self {
        let mut hex = String::with_capacity(digest.len() * 2);
        for &byte in digest {
            // Writing into a String cannot fail
            let _ = write!(hex, "{:02X}", encode_byte(byte));
        }
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Fingerprint {
    fn from(hex: String) -> Self {
        Self(hex)
    }
}

impl From<&str> for Fingerprint {
    fn from(hex: &str) -> Self {
        Self(hex.to_string())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Value written for one digest byte.
///
/// The low 7 bits of the byte, plus 128 when the signed byte is negative.
/// Existing hash lists and reports were produced with this rule, so it is
/// kept literally even though it equals the unsigned byte value.
fn encode_byte(byte: u8) -> u16 {
    let signed = byte as i8;
    let low = (signed & 0x7F) as u16;
    if signed < 0 {
        low + 128
    } else {
        low
    }
}

/// Trait for fingerprint implementations
pub trait Fingerprinter: Send + Sync {
    /// Fingerprint an already decoded image
    fn fingerprint_image(&self, image: &DynamicImage, path: &Path)
        -> Result<Fingerprint, HashError>;

    /// Decode a file and fingerprint it
    fn fingerprint_file(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let image = decode(path)?;
        self.fingerprint_image(&image, path)
    }
}

/// MD5 over big-endian raw samples.
///
/// Stateless: every call creates its own digest context, so one instance
/// can be shared freely between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct PixelFingerprinter;

impl PixelFingerprinter {
    pub fn new() -> Self {
        Self
    }
}

impl Fingerprinter for PixelFingerprinter {
    fn fingerprint_image(
        &self,
        image: &DynamicImage,
        path: &Path,
    ) -> Result<Fingerprint, HashError> {
        let samples = Samples::from_image(image).ok_or_else(|| HashError::UnsupportedLayout {
            path: path.to_path_buf(),
            layout: format!("{:?}", image.color()),
        })?;

        let mut hasher = Md5::new();
        hasher.update(samples.to_be_bytes());
        Ok(Fingerprint::from_digest(&hasher.finalize()))
    }
}

/// Fingerprint a file, or `None` when it is not a decodable image.
///
/// The failure is logged; callers skip the file.
pub fn fingerprint(path: &Path) -> Option<Fingerprint> {
    match PixelFingerprinter.fingerprint_file(path) {
        Ok(fingerprint) => Some(fingerprint),
        Err(e) => {
            warn!("Could not generate hash for file {}: {}", path.display(), e);
            None
        }
    }
}

/// Decode an image, detecting the format from the file content.
///
/// Extensions are not trusted since backup copies (`.bak`) are scanned too.
pub fn decode(path: &Path) -> Result<DynamicImage, HashError> {
    let reader = ImageReader::open(path)
        .map_err(|e| HashError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?
        .with_guessed_format()
        .map_err(|e| HashError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;

    reader.decode().map_err(|e| match e {
        ImageError::IoError(source) => HashError::IoError {
            path: path.to_path_buf(),
            source,
        },
        other => HashError::DecodeError {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    })
}
