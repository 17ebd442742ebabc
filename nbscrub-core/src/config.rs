//! Configuration management for `nbscrub-core`.
//!
//! This module defines the cleaning configuration: which code points the
//! string cleaner strips and how the repaired notebook is written. It handles
//! YAML deserialization and provides utilities for loading, merging, and
//! validating configs.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::ScrubError;
use crate::notebook::WriteOptions;

/// Upper bound for `indent`.
pub const MAX_INDENT: usize = 8;

/// Top-level cleaning configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScrubConfig {
    /// Code points to remove, written as `U+XXXX`.
    #[serde(default)]
    pub strip: Vec<String>,
    /// Spaces per indentation level on output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent: Option<usize>,
    /// Whether to end the output with a newline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailing_newline: Option<bool>,
}

impl ScrubConfig {
    /// Loads a configuration from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: ScrubConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.validate()?;
        for entry in config.surrogate_entries() {
            info!(
                "Strip entry {} in {} is a surrogate; lone surrogates are always dropped on read.",
                entry,
                path.display()
            );
        }
        debug!("Loaded {} strip entries from {}.", config.strip.len(), path.display());
        Ok(config)
    }

    /// Loads the embedded default configuration.
    pub fn load_default() -> Result<Self> {
        debug!("Loading default configuration from embedded string...");
        let default_yaml = include_str!("../config/default_config.yaml");
        let config: ScrubConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default configuration")?;
        Ok(config)
    }

    /// Checks every field, reporting all problems at once.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        for entry in &self.strip {
            if let Err(e) = parse_code_point(entry) {
                errors.push(e);
            }
        }
        if let Some(indent) = self.indent {
            if indent > MAX_INDENT {
                errors.push(format!(
                    "`indent` is {}, the maximum allowed is {}.",
                    indent, MAX_INDENT
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("Configuration validation failed:\n{}", errors.join("\n")))
        }
    }

    /// The characters the string cleaner should remove. Surrogate entries
    /// have no `char` form and are skipped; the reader drops them anyway.
    pub fn strip_chars(&self) -> Result<Vec<char>, ScrubError> {
        let mut chars = Vec::new();
        for entry in &self.strip {
            let code = parse_code_point(entry).map_err(ScrubError::Config)?;
            if let Some(c) = char::from_u32(code) {
                chars.push(c);
            }
        }
        Ok(chars)
    }

    /// Strip entries naming surrogate code points. They are valid but have
    /// no effect beyond what the reader already does.
    pub fn surrogate_entries(&self) -> Vec<&str> {
        self.strip
            .iter()
            .filter(|entry| {
                parse_code_point(entry).is_ok_and(|code| (0xD800..=0xDFFF).contains(&code))
            })
            .map(String::as_str)
            .collect()
    }

    pub fn write_options(&self) -> WriteOptions {
        let defaults = WriteOptions::default();
        WriteOptions {
            indent: self.indent.unwrap_or(defaults.indent),
            trailing_newline: self.trailing_newline.unwrap_or(defaults.trailing_newline),
        }
    }
}

/// Merges a user configuration over the defaults. User strip entries are
/// appended to the default list; scalar settings override.
pub fn merge_config(default_config: ScrubConfig, user_config: Option<ScrubConfig>) -> ScrubConfig {
    let Some(user) = user_config else {
        return default_config;
    };
    debug!("Merging {} user strip entries over defaults.", user.strip.len());

    let mut strip = default_config.strip;
    for entry in user.strip {
        let code = parse_code_point(&entry).ok();
        let duplicate = strip
            .iter()
            .any(|existing| existing == &entry || (code.is_some() && parse_code_point(existing).ok() == code));
        if !duplicate {
            strip.push(entry);
        }
    }

    ScrubConfig {
        strip,
        indent: user.indent.or(default_config.indent),
        trailing_newline: user.trailing_newline.or(default_config.trailing_newline),
    }
}

/// Parses `U+XXXX` (case-insensitive prefix, 1 to 6 hex digits).
pub fn parse_code_point(entry: &str) -> Result<u32, String> {
    let trimmed = entry.trim();
    let hex = trimmed
        .strip_prefix("U+")
        .or_else(|| trimmed.strip_prefix("u+"))
        .ok_or_else(|| format!("Strip entry '{}' must be written as U+XXXX.", entry))?;

    if hex.is_empty() || hex.len() > 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!("Strip entry '{}' has an invalid hex value.", entry));
    }
    let code = u32::from_str_radix(hex, 16)
        .map_err(|e| format!("Strip entry '{}' has an invalid hex value: {}", entry, e))?;
    if code > 0x10FFFF {
        return Err(format!("Strip entry '{}' is beyond U+10FFFF.", entry));
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_code_point() {
        assert_eq!(parse_code_point("U+FFFD"), Ok(0xFFFD));
        assert_eq!(parse_code_point("u+200b"), Ok(0x200B));
        assert!(parse_code_point("FFFD").is_err());
        assert!(parse_code_point("U+").is_err());
        assert!(parse_code_point("U+XYZ").is_err());
        assert!(parse_code_point("U+110000").is_err());
    }

    #[test]
    fn test_surrogate_entries_skipped_in_chars() {
        let config = ScrubConfig {
            strip: vec!["U+DCC8".to_string(), "U+FFFD".to_string()],
            indent: None,
            trailing_newline: None,
        };
        assert_eq!(config.strip_chars().unwrap(), vec!['\u{FFFD}']);
        assert_eq!(config.surrogate_entries(), vec!["U+DCC8"]);
    }

    #[test]
    fn test_no_surrogate_entries() {
        let config = ScrubConfig {
            strip: vec!["U+FFFD".to_string(), "not a code point".to_string()],
            indent: None,
            trailing_newline: None,
        };
        assert!(config.surrogate_entries().is_empty());
    }
}
