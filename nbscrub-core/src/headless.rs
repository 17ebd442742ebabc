// File: nbscrub-core/src/headless.rs

//! `headless.rs`
//! Convenience wrapper for one-shot, non-interactive sanitization of a
//! notebook held in memory: read, validate, clean, serialize.

use log::info;

use crate::config::ScrubConfig;
use crate::errors::ScrubError;
use crate::notebook::Notebook;
use crate::report::SanitizeReport;
use crate::sanitizer::Sanitizer;

/// The repaired notebook text and what it took to get there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedDocument {
    pub text: String,
    pub report: SanitizeReport,
}

/// Fully sanitizes raw notebook bytes.
///
/// Nothing is returned unless every step succeeds, so callers can write the
/// result over the original file without risking a partial document.
///
/// # Arguments
///
/// * `config` - The merged configuration (defaults + optional user overrides).
/// * `input` - The notebook bytes, possibly containing invalid UTF-8.
pub fn headless_sanitize_bytes(
    config: &ScrubConfig,
    input: &[u8],
) -> Result<SanitizedDocument, ScrubError> {
    let sanitizer = Sanitizer::from_config(config)?;
    let mut notebook = Notebook::from_bytes(input)?;
    let report = sanitizer.sanitize(&mut notebook);
    let text = notebook.to_json_string(config.write_options())?;
    info!(
        "Sanitized {} cell(s); {} string(s) changed.",
        report.cells, report.strings_changed
    );
    Ok(SanitizedDocument { text, report })
}
