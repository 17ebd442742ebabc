// nbscrub-core/tests/config_integration_tests.rs
use anyhow::Result;
use std::io::Write;
use tempfile::NamedTempFile;

use nbscrub_core::config::{self, ScrubConfig};
use nbscrub_core::WriteOptions;

#[test]
fn test_load_default_config() {
    let config = ScrubConfig::load_default().unwrap();
    assert!(config.strip.iter().any(|s| s == "U+FFFD"));
    assert!(config.strip.iter().any(|s| s == "U+DCC8"));
    assert_eq!(
        config.write_options(),
        WriteOptions {
            indent: 1,
            trailing_newline: false
        }
    );
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_from_file() -> Result<()> {
    let yaml_content = r#"
strip:
  - "U+200B"
  - "u+feff"
indent: 2
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let config = ScrubConfig::load_from_file(file.path())?;
    assert_eq!(config.strip, vec!["U+200B".to_string(), "u+feff".to_string()]);
    assert_eq!(config.indent, Some(2));
    assert_eq!(config.trailing_newline, None);
    assert_eq!(config.strip_chars()?, vec!['\u{200B}', '\u{FEFF}']);
    Ok(())
}

#[test]
fn test_load_from_file_reports_every_problem() -> Result<()> {
    let yaml_content = r#"
strip:
  - "FFFD"
  - "U+ZZZZ"
indent: 12
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let err = ScrubConfig::load_from_file(file.path()).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("'FFFD' must be written as U+XXXX"), "{}", message);
    assert!(message.contains("'U+ZZZZ' has an invalid hex value"), "{}", message);
    assert!(message.contains("`indent` is 12"), "{}", message);
    Ok(())
}

#[test]
fn test_load_from_missing_file() {
    let err = ScrubConfig::load_from_file("/definitely/not/here.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_merge_config_no_user_config() {
    let defaults = ScrubConfig::load_default().unwrap();
    let merged = config::merge_config(defaults.clone(), None);
    assert_eq!(merged, defaults);
}

#[test]
fn test_merge_config_appends_and_overrides() {
    let defaults = ScrubConfig::load_default().unwrap();
    let user = ScrubConfig {
        strip: vec!["u+fffd".to_string(), "U+200B".to_string()],
        indent: Some(4),
        trailing_newline: Some(true),
    };
    let merged = config::merge_config(defaults, Some(user));
    // "u+fffd" names the same code point as the default "U+FFFD"
    assert_eq!(merged.strip, vec!["U+DCC8", "U+FFFD", "U+200B"]);
    assert_eq!(
        merged.write_options(),
        WriteOptions {
            indent: 4,
            trailing_newline: true
        }
    );
}

#[test]
fn test_merge_config_keeps_default_scalars() {
    let defaults = ScrubConfig::load_default().unwrap();
    let user = ScrubConfig {
        strip: Vec::new(),
        indent: None,
        trailing_newline: None,
    };
    let merged = config::merge_config(defaults, Some(user));
    assert_eq!(merged.indent, Some(1));
    assert_eq!(merged.trailing_newline, Some(false));
}
