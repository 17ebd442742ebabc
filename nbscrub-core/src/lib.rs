// nbscrub-core/src/lib.rs
//! # nbscrub Core Library
//!
//! `nbscrub-core` repairs malformed Unicode inside notebook documents (JSON
//! with a `cells` list) so they can be re-serialized and accepted by tools
//! that reject invalid encodings. It has no terminal or file-system
//! concerns; the `nbscrub` CLI builds on it.
//!
//! ## Modules
//!
//! * `text`: The string cleaner and the raw-form helpers `clean_utf16` / `clean_bytes`.
//! * `lenient`: Tolerant decoding of input bytes, lone surrogate escapes and non-finite literals.
//! * `notebook`: The in-memory document, its shape checks, typed field views and writer.
//! * `sanitizer`: The tree walk over cells and outputs.
//! * `report`: Counters collected during a run.
//! * `config`: YAML configuration: stripped code points and output layout.
//! * `headless`: One-shot sanitization of an in-memory document.
//! * `errors`: The `ScrubError` enum.
//!
//! ## Usage Example
//!
//! ```rust
//! use nbscrub_core::{headless_sanitize_bytes, ScrubConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ScrubConfig::load_default()?;
//!     let input = br#"{"cells": [{"source": ["print(1)\n", "\udcc8\n"]}]}"#;
//!
//!     let cleaned = headless_sanitize_bytes(&config, input)?;
//!     assert!(cleaned.text.contains(r#""\n""#));
//!     assert_eq!(cleaned.report.cells, 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Document-level operations return [`ScrubError`]; configuration loading
//! uses `anyhow::Result` with context attached.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod config;
pub mod errors;
pub mod headless;
pub mod lenient;
pub mod notebook;
pub mod report;
pub mod sanitizer;
pub mod text;

pub use config::{merge_config, parse_code_point, ScrubConfig, MAX_INDENT};
pub use errors::ScrubError;
pub use headless::{headless_sanitize_bytes, SanitizedDocument};
pub use lenient::{
    decode_lossy, encode_non_finite, neutralize_lone_surrogates, LenientText, NonFinite,
    NonFiniteMarker,
};
pub use notebook::{AnyValue, Notebook, TextOrSequence, WriteOptions};
pub use report::SanitizeReport;
pub use sanitizer::Sanitizer;
pub use text::{clean_bytes, clean_utf16, StringCleaner, PROBLEM_CODE_POINT, REPLACEMENT_CHARACTER};
