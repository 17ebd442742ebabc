//! Counters collected while a notebook is sanitized.

use serde::{Deserialize, Serialize};

/// Summary of one sanitization run. Informational only; nothing in the
/// cleaning itself depends on these numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizeReport {
    pub cells: usize,
    pub outputs: usize,
    pub strings_visited: usize,
    pub strings_changed: usize,
    pub characters_removed: usize,
    /// Placeholders substituted by the lenient reader for invalid UTF-8 and
    /// lone surrogate escapes.
    pub replaced_on_read: usize,
}

impl SanitizeReport {
    /// True when the cleaned document differs from its input.
    pub fn has_changes(&self) -> bool {
        self.strings_changed > 0 || self.replaced_on_read > 0
    }

    pub(crate) fn record(&mut self, removed: usize) {
        self.strings_visited += 1;
        if removed > 0 {
            self.strings_changed += 1;
            self.characters_removed += removed;
        }
    }
}
