//! The string cleaner.
//!
//! Repair happens in three steps: drop code points that cannot be encoded
//! as UTF-8 (unpaired surrogates), drop byte sequences that are not valid
//! UTF-8, then strip the configured code points (by default the replacement
//! character and the `U+DCC8` surrogate that motivated this tool).
//!
//! A Rust `&str` already satisfies the first two steps, so they live in
//! [`clean_utf16`] and [`clean_bytes`], which accept the raw forms where bad
//! data can still exist. [`StringCleaner`] applies the last step to text that
//! made it through the lenient reader.

use std::borrow::Cow;

use serde_json::Value;

/// The surrogate code point observed in the notebooks this tool was written for.
pub const PROBLEM_CODE_POINT: u32 = 0xDCC8;

/// U+FFFD, the placeholder substituted for undecodable input.
pub const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

/// Decodes UTF-16 code units, discarding every unpaired surrogate, then
/// removes the replacement character.
pub fn clean_utf16(units: &[u16]) -> String {
    let decoded: String = char::decode_utf16(units.iter().copied())
        .filter_map(Result::ok)
        .collect();
    StringCleaner::default().clean(&decoded).into_owned()
}

/// Decodes raw bytes, discarding (not replacing) invalid UTF-8 sequences,
/// then removes the replacement character.
pub fn clean_bytes(bytes: &[u8]) -> String {
    let mut decoded = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        decoded.push_str(chunk.valid());
    }
    StringCleaner::default().clean(&decoded).into_owned()
}

/// Strips a fixed set of characters from text.
///
/// Removing members of a set is idempotent, so `clean(clean(s)) == clean(s)`
/// for any configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringCleaner {
    strip: Vec<char>,
}

impl Default for StringCleaner {
    fn default() -> Self {
        Self {
            strip: vec![REPLACEMENT_CHARACTER],
        }
    }
}

impl StringCleaner {
    /// Builds a cleaner that removes the given characters. Duplicates are ignored.
    pub fn new<I: IntoIterator<Item = char>>(strip: I) -> Self {
        let mut chars: Vec<char> = Vec::new();
        for c in strip {
            if !chars.contains(&c) {
                chars.push(c);
            }
        }
        Self { strip: chars }
    }

    /// Returns the text with every stripped character removed, borrowing
    /// when there is nothing to remove.
    pub fn clean<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !text.contains(self.strip.as_slice()) {
            return Cow::Borrowed(text);
        }
        Cow::Owned(text.chars().filter(|c| !self.strip.contains(c)).collect())
    }

    /// Cleans a JSON value in place if it is a string. Any other value is
    /// left exactly as it was. Returns the number of characters removed.
    pub fn clean_value(&self, value: &mut Value) -> usize {
        match value {
            Value::String(s) => self.clean_string(s),
            _ => 0,
        }
    }

    /// Cleans an owned string in place. Returns the number of characters removed.
    pub fn clean_string(&self, s: &mut String) -> usize {
        let before = s.chars().count();
        if let Cow::Owned(cleaned) = self.clean(s) {
            let removed = before - cleaned.chars().count();
            *s = cleaned;
            removed
        } else {
            0
        }
    }
}
