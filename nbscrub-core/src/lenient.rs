//! Lenient decoding of notebook bytes into parseable JSON text.
//!
//! Two kinds of damage are tolerated here rather than rejected by the parser:
//! byte sequences that are not UTF-8, and `\uXXXX` escapes naming a surrogate
//! with no partner. Both are replaced by U+FFFD, which the string cleaner
//! later removes from every field it visits.
//!
//! The bare literals `NaN`, `Infinity` and `-Infinity` are not JSON, but
//! notebook writers emit them. They are parsed as placeholder integers (see
//! [`NonFiniteMarker`]) and put back when the document is written.

use std::borrow::Cow;

use log::debug;

use crate::text::REPLACEMENT_CHARACTER;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const REPLACEMENT_ESCAPE: &str = "\\ufffd";

/// Text produced by the lenient reader, with a count of the placeholders it
/// had to substitute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LenientText<'a> {
    pub text: Cow<'a, str>,
    pub replaced: usize,
}

/// Decodes bytes as UTF-8, skipping a leading byte-order mark and
/// substituting one U+FFFD per invalid sequence.
pub fn decode_lossy(bytes: &[u8]) -> LenientText<'_> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    if let Ok(text) = std::str::from_utf8(bytes) {
        return LenientText {
            text: Cow::Borrowed(text),
            replaced: 0,
        };
    }

    let mut text = String::with_capacity(bytes.len());
    let mut replaced = 0;
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
        if !chunk.invalid().is_empty() {
            text.push(REPLACEMENT_CHARACTER);
            replaced += 1;
        }
    }
    debug!("Substituted {} invalid UTF-8 sequence(s) on read.", replaced);

    LenientText {
        text: Cow::Owned(text),
        replaced,
    }
}

/// Rewrites every lone surrogate escape inside JSON string literals to
/// `\ufffd`. Properly paired escapes and everything outside strings are
/// copied verbatim. Malformed escapes are left for the parser to report.
pub fn neutralize_lone_surrogates(json: &str) -> LenientText<'_> {
    if !json.contains("\\u") {
        return LenientText {
            text: Cow::Borrowed(json),
            replaced: 0,
        };
    }

    let bytes = json.as_bytes();
    let mut out = String::new();
    let mut copied_up_to = 0;
    let mut replaced = 0;
    let mut in_string = false;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                in_string = !in_string;
                i += 1;
            }
            b'\\' if in_string => {
                let Some(unit) = unicode_escape_at(bytes, i) else {
                    i += 2;
                    continue;
                };
                if is_high_surrogate(unit)
                    && unicode_escape_at(bytes, i + 6).is_some_and(is_low_surrogate)
                {
                    i += 12;
                } else if is_surrogate(unit) {
                    if out.is_empty() {
                        out.reserve(json.len());
                    }
                    out.push_str(&json[copied_up_to..i]);
                    out.push_str(REPLACEMENT_ESCAPE);
                    i += 6;
                    copied_up_to = i;
                    replaced += 1;
                } else {
                    i += 6;
                }
            }
            _ => i += 1,
        }
    }

    if replaced == 0 {
        return LenientText {
            text: Cow::Borrowed(json),
            replaced: 0,
        };
    }

    out.push_str(&json[copied_up_to..]);
    debug!("Neutralized {} lone surrogate escape(s).", replaced);
    LenientText {
        text: Cow::Owned(out),
        replaced,
    }
}

/// Reads the code unit of a `\uXXXX` escape starting at `at`, if there is one.
fn unicode_escape_at(bytes: &[u8], at: usize) -> Option<u16> {
    let escape = bytes.get(at..at + 6)?;
    if escape[0] != b'\\' || escape[1] != b'u' {
        return None;
    }
    let hex = std::str::from_utf8(&escape[2..]).ok()?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(hex, 16).ok()
}

fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

fn is_surrogate(unit: u16) -> bool {
    (0xD800..=0xDFFF).contains(&unit)
}

/// A non-finite number literal accepted outside string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonFinite {
    NaN,
    Infinity,
    NegInfinity,
}

impl NonFinite {
    // `-Infinity` first so the sign is consumed with it
    const ALL: [NonFinite; 3] = [NonFinite::NegInfinity, NonFinite::Infinity, NonFinite::NaN];

    pub fn literal(self) -> &'static str {
        match self {
            NonFinite::NaN => "NaN",
            NonFinite::Infinity => "Infinity",
            NonFinite::NegInfinity => "-Infinity",
        }
    }

    fn tag(self) -> u8 {
        match self {
            NonFinite::NaN => b'1',
            NonFinite::Infinity => b'2',
            NonFinite::NegInfinity => b'3',
        }
    }

    fn from_tag(tag: u8) -> Option<Self> {
        NonFinite::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

const MARKER_DIGITS: &str = "7137262531844061937299";

/// The integer that stands in for non-finite literals while a document is
/// parsed. Its digits never occur in the text it was chosen for, so every
/// placeholder found outside a string on output is one of ours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonFiniteMarker {
    prefix: String,
}

impl NonFiniteMarker {
    fn unused_in(json: &str) -> Self {
        let mut digits = String::from(MARKER_DIGITS);
        while json.contains(digits.as_str()) {
            digits.push('7');
        }
        Self {
            prefix: format!("-{}", digits),
        }
    }

    fn placeholder(&self, kind: NonFinite) -> String {
        format!("{}{}", self.prefix, kind.tag() as char)
    }

    /// Puts the original literals back in serialized JSON.
    pub fn restore<'a>(&self, json: &'a str) -> Cow<'a, str> {
        let prefix = self.prefix.as_bytes();
        let (text, restored) = rewrite_outside_strings(json, |bytes, at| {
            let rest = &bytes[at..];
            if !rest.starts_with(prefix) {
                return None;
            }
            let kind = NonFinite::from_tag(*rest.get(prefix.len())?)?;
            let len = prefix.len() + 1;
            if rest.get(len).is_some_and(u8::is_ascii_digit) {
                return None;
            }
            Some((len, kind.literal().to_string()))
        });
        debug!("Restored {} non-finite literal(s).", restored);
        text
    }
}

/// Replaces `NaN`, `Infinity` and `-Infinity` outside string literals with
/// placeholder integers the parser accepts. Returns the marker needed to
/// restore them, or `None` if there were none.
pub fn encode_non_finite(json: &str) -> (Cow<'_, str>, Option<NonFiniteMarker>) {
    if !NonFinite::ALL.iter().any(|kind| json.contains(kind.literal())) {
        return (Cow::Borrowed(json), None);
    }

    let marker = NonFiniteMarker::unused_in(json);
    let (text, encoded) = rewrite_outside_strings(json, |bytes, at| {
        if at > 0 && is_word_byte(bytes[at - 1]) {
            return None;
        }
        NonFinite::ALL.into_iter().find_map(|kind| {
            let literal = kind.literal().as_bytes();
            let follows_word = bytes.get(at + literal.len()).is_some_and(|b| is_word_byte(*b));
            (bytes[at..].starts_with(literal) && !follows_word)
                .then(|| (literal.len(), marker.placeholder(kind)))
        })
    });

    if encoded == 0 {
        return (text, None);
    }
    debug!("Encoded {} non-finite literal(s) for parsing.", encoded);
    (text, Some(marker))
}

/// Copies `json`, letting `replace` rewrite tokens that start outside string
/// literals. `replace` returns the number of bytes consumed and the text to
/// emit in their place. Also returns the number of replacements.
fn rewrite_outside_strings<F>(json: &str, mut replace: F) -> (Cow<'_, str>, usize)
where
    F: FnMut(&[u8], usize) -> Option<(usize, String)>,
{
    let bytes = json.as_bytes();
    let mut out = String::new();
    let mut copied_up_to = 0;
    let mut count = 0;
    let mut in_string = false;
    let mut i = 0;

    while i < bytes.len() {
        if in_string {
            match bytes[i] {
                b'\\' => i += 2,
                b'"' => {
                    in_string = false;
                    i += 1;
                }
                _ => i += 1,
            }
            continue;
        }
        if bytes[i] == b'"' {
            in_string = true;
            i += 1;
            continue;
        }
        match replace(bytes, i) {
            Some((consumed, replacement)) => {
                out.push_str(&json[copied_up_to..i]);
                out.push_str(&replacement);
                i += consumed;
                copied_up_to = i;
                count += 1;
            }
            None => i += 1,
        }
    }

    if count == 0 {
        return (Cow::Borrowed(json), 0);
    }
    out.push_str(&json[copied_up_to..]);
    (Cow::Owned(out), count)
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
