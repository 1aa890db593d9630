//! Trait definitions for pair matching rules.

use crate::core::hashlist::HashEntry;

/// Rule deciding whether two hash entries are duplicates of each other
pub trait MatchRule: Send + Sync {
    /// Determine if two entries should be considered duplicates
    fn is_match(&self, a: &HashEntry, b: &HashEntry) -> bool;
}

/// Exact fingerprint equality, optionally requiring equal file names too
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatchRule {
    compare_filenames: bool,
}

impl ExactMatchRule {
    pub fn new(compare_filenames: bool) -> Self {
        Self { compare_filenames }
    }
}

impl MatchRule for ExactMatchRule {
    fn is_match(&self, a: &HashEntry, b: &HashEntry) -> bool {
        a.fingerprint() == b.fingerprint()
            && (!self.compare_filenames || a.filename() == b.filename())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fingerprint::Fingerprint;

    fn entry(fingerprint: &str, file: &str) -> HashEntry {
        HashEntry::new(Fingerprint::from(fingerprint), file)
    }

    #[test]
    fn equal_fingerprints_match() {
        let rule = ExactMatchRule::default();

        assert!(rule.is_match(&entry("H1", "/a/x.jpg"), &entry("H1", "/b/y.jpg")));
        assert!(!rule.is_match(&entry("H1", "/a/x.jpg"), &entry("H2", "/a/x.jpg")));
    }

    #[test]
    fn filename_rule_needs_equal_names() {
        let rule = ExactMatchRule::new(true);

        assert!(rule.is_match(&entry("H1", "/a/x.jpg"), &entry("H1", "/b/x.jpg")));
        assert!(!rule.is_match(&entry("H1", "/a/x.jpg"), &entry("H1", "/b/y.jpg")));
        assert!(!rule.is_match(&entry("H1", "/a/x.jpg"), &entry("H1", "/b/X.jpg")));
    }
}
