//! Filename pattern matching for the scanner.

use crate::error::ScanError;
use regex::{Regex, RegexBuilder};

/// Pattern used when the caller supplies no filter
pub const DEFAULT_FILENAME_PATTERN: &str = r".*\.(?:jpg|jpeg|gif|png|bak|bak1|bak2|bak3)$";

/// Characters escaped when a filter is turned into a regex
const ESCAPED: &[char] = &['[', ']', '(', ')', '{', '}', '|', '?', '+', '^', '$', '.'];

/// Case-insensitive whole-name filename filter.
///
/// Keeps the pattern text it was built from; that text is what hash lists
/// record on their second line.
#[derive(Debug, Clone)]
pub struct FilenamePattern {
    source: String,
    regex: Regex,
}

impl FilenamePattern {
    /// Compile a regex pattern, e.g. one read back from a hash list
    pub fn new(pattern: &str) -> Result<Self, ScanError> {
        let regex = RegexBuilder::new(&format!("^(?:{})$", pattern))
            .case_insensitive(true)
            .build()
            .map_err(|e| ScanError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Build a pattern from a shell-like filter.
    ///
    /// Regex metacharacters are taken literally, `*` matches any sequence
    /// and `!` separates alternatives: `*.jpg!*.png`. A blank filter
    /// falls back to [`DEFAULT_FILENAME_PATTERN`].
    pub fn from_filter(filter: &str) -> Result<Self, ScanError> {
        if filter.trim().is_empty() {
            return Ok(Self::default());
        }
        Self::new(&translate_filter(filter))
    }

    /// Check a file name (not a full path)
    pub fn is_match(&self, filename: &str) -> bool {
        self.regex.is_match(filename)
    }

    /// The pattern text as recorded in hash lists
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl Default for FilenamePattern {
    fn default() -> Self {
        Self {
            source: DEFAULT_FILENAME_PATTERN.to_string(),
            regex: RegexBuilder::new(&format!("^(?:{})$", DEFAULT_FILENAME_PATTERN))
                .case_insensitive(true)
                .build()
                .expect("default filename pattern is a valid regex"),
        }
    }
}

/// Translate a shell-like filter into regex text
pub fn translate_filter(filter: &str) -> String {
    let mut pattern = String::with_capacity(filter.len() * 2 + 4);
    pattern.push_str("(?:");
    for c in filter.chars() {
        match c {
            '!' => pattern.push('|'),
            '*' => pattern.push_str(".*"),
            c if ESCAPED.contains(&c) => {
                pattern.push('\\');
                pattern.push(c);
            }
            c => pattern.push(c),
        }
    }
    pattern.push(')');
    pattern
}
