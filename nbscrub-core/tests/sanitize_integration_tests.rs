//! Integration tests for the notebook sanitizer.
//! Verifies that text fields are repaired while everything else, shape
//! included, comes through unchanged.

use anyhow::Result;
use serde_json::{json, Value};
use test_log::test;

use nbscrub_core::{
    headless_sanitize_bytes, Notebook, Sanitizer, ScrubConfig, ScrubError, WriteOptions,
};

fn default_sanitizer() -> Sanitizer {
    Sanitizer::from_config(&ScrubConfig::load_default().unwrap()).unwrap()
}

/// Reads, cleans and re-serializes with the default configuration.
fn scrub(input: &[u8]) -> Result<String> {
    let config = ScrubConfig::load_default()?;
    Ok(headless_sanitize_bytes(&config, input)?.text)
}

fn scrub_value(input: &[u8]) -> Result<Value> {
    Ok(serde_json::from_str(&scrub(input)?)?)
}

fn messy_notebook() -> &'static [u8] {
    br##"{
 "cells": [
  {
   "cell_type": "code",
   "execution_count": 3,
   "metadata": {"tags": ["\udcc8"]},
   "source": ["import os\n", "print('\udcc8 done')\n", 7, null],
   "outputs": [
    {
     "output_type": "stream",
     "name": "stdout",
     "text": "caf\u00e9 \ufffd\n"
    },
    {
     "output_type": "execute_result",
     "execution_count": 3,
     "data": {
      "text/plain": ["line\ufffd", 1.5, false],
      "image/png": "iVBORw0KGgo=",
      "application/json": {"nested": "\ufffd"}
     },
     "metadata": {}
    }
   ]
  },
  {
   "cell_type": "markdown",
   "metadata": {},
   "source": "# Title \ud83d\udc0d"
  }
 ],
 "metadata": {"kernelspec": {"name": "python3"}},
 "nbformat": 4,
 "nbformat_minor": 5
}"##
}

#[test]
fn test_end_to_end_problem_code_point_in_source() -> Result<()> {
    let out = scrub_value(br#"{"cells": [{"source": ["print(1)\n", "\udcc8\n"]}]}"#)?;
    assert_eq!(out["cells"][0]["source"], json!(["print(1)\n", "\n"]));
    Ok(())
}

#[test]
fn test_end_to_end_replacement_character_in_data() -> Result<()> {
    let out = scrub_value(
        br#"{"cells": [{"outputs": [{"data": {"text/plain": "result\ufffd"}}]}]}"#,
    )?;
    assert_eq!(out["cells"][0]["outputs"][0]["data"], json!({"text/plain": "result"}));
    Ok(())
}

#[test]
fn test_raw_invalid_bytes_are_removed_from_text() -> Result<()> {
    // ED B3 88 is U+DCC8 written as raw (invalid) UTF-8
    let input = b"{\"cells\": [{\"source\": \"x\xED\xB3\x88y\xC3\"}]}";
    let out = scrub_value(input)?;
    assert_eq!(out["cells"][0]["source"], json!("xy"));
    Ok(())
}

#[test]
fn test_idempotence() -> Result<()> {
    let once = scrub(messy_notebook())?;
    let twice = scrub(once.as_bytes())?;
    assert_eq!(once, twice);
    Ok(())
}

#[test]
fn test_shape_preservation_and_passthrough() -> Result<()> {
    let out = scrub_value(messy_notebook())?;
    let cell = &out["cells"][0];

    assert_eq!(cell["source"], json!(["import os\n", "print(' done')\n", 7, null]));
    assert_eq!(cell["outputs"][0]["text"], json!("café \n"));

    let data = &cell["outputs"][1]["data"];
    assert_eq!(data["text/plain"], json!(["line", 1.5, false]));
    assert_eq!(data["image/png"], json!("iVBORw0KGgo="));
    assert_eq!(data["application/json"], json!({"nested": "\u{FFFD}"}));

    assert_eq!(cell["execution_count"], json!(3));
    assert_eq!(cell["outputs"][1]["execution_count"], json!(3));
    assert_eq!(out["cells"][1]["source"], json!("# Title 🐍"));
    assert_eq!(out["nbformat_minor"], json!(5));
    Ok(())
}

#[test]
fn test_no_surrogates_or_replacement_in_cleaned_fields() -> Result<()> {
    let text = scrub(messy_notebook())?;
    assert!(!text.contains("\\udcc8"));
    assert!(!text.contains("\\ufffd"));

    let out: Value = serde_json::from_str(&text)?;
    let cell = &out["cells"][0];
    for line in cell["source"].as_array().unwrap().iter().filter_map(Value::as_str) {
        assert!(!line.contains('\u{FFFD}'));
    }
    assert!(!cell["outputs"][0]["text"].as_str().unwrap().contains('\u{FFFD}'));
    Ok(())
}

#[test]
fn test_round_trip_on_clean_input() -> Result<()> {
    let input = json!({
        "cells": [
            {"cell_type": "code", "source": ["x = 1\n", "x"], "outputs": [
                {"output_type": "execute_result", "data": {"text/plain": ["1"]}}
            ]},
            {"cell_type": "markdown", "source": "Ünïcödé ✓"}
        ],
        "metadata": {},
        "nbformat": 4
    });
    let out = scrub_value(input.to_string().as_bytes())?;
    assert_eq!(out, input);
    Ok(())
}

#[test]
fn test_output_is_single_space_indented_with_unescaped_unicode() -> Result<()> {
    let text = scrub("{\"cells\": [], \"title\": \"naïve 🐍\"}".as_bytes())?;
    assert_eq!(text, "{\n \"cells\": [],\n \"title\": \"naïve 🐍\"\n}");
    assert!(!text.contains('\r'));
    Ok(())
}

#[test]
fn test_big_integers_in_metadata_unchanged() -> Result<()> {
    let text = scrub(br#"{"cells": [], "metadata": {"id": 123456789012345678901234567890, "neg": -98765432109876543210}}"#)?;
    assert_eq!(
        text,
        "{\n \"cells\": [],\n \"metadata\": {\n  \"id\": 123456789012345678901234567890,\n  \"neg\": -98765432109876543210\n }\n}"
    );
    Ok(())
}

#[test]
fn test_non_finite_numbers_round_trip() -> Result<()> {
    let input = br#"{"cells": [{"source": ["x\ufffd", NaN]}], "metadata": {"v": Infinity, "w": -Infinity, "s": "NaN"}}"#;
    let config = ScrubConfig::load_default()?;
    let cleaned = headless_sanitize_bytes(&config, input)?;

    assert_eq!(
        cleaned.text,
        "{\n \"cells\": [\n  {\n   \"source\": [\n    \"x\",\n    NaN\n   ]\n  }\n ],\n \"metadata\": {\n  \"v\": Infinity,\n  \"w\": -Infinity,\n  \"s\": \"NaN\"\n }\n}"
    );
    assert_eq!(cleaned.report.strings_visited, 1);
    assert_eq!(cleaned.report.strings_changed, 1);
    Ok(())
}

#[test]
fn test_malformed_input_fails() {
    let config = ScrubConfig::load_default().unwrap();
    let inputs: [&[u8]; 4] = [b"{\"cells\": [}", b"not json", b"[]", b"{\"cells\": [1]}"];
    for input in inputs {
        let result = headless_sanitize_bytes(&config, input);
        assert!(
            matches!(result, Err(ScrubError::Parse(_)) | Err(ScrubError::Shape(_))),
            "expected failure for {:?}",
            String::from_utf8_lossy(input)
        );
    }
}

#[test]
fn test_sanitizer_reports_cell_count() {
    let mut notebook = Notebook::from_bytes(messy_notebook()).unwrap();
    assert_eq!(notebook.cell_count(), 2);
    assert_eq!(notebook.replaced_on_read(), 2);

    let report = default_sanitizer().sanitize(&mut notebook);
    assert_eq!(report.cells, 2);
    assert_eq!(report.outputs, 2);
    assert!(report.has_changes());

    let text = notebook.to_json_string(WriteOptions::default()).unwrap();
    assert!(text.starts_with("{\n \"cells\": [\n"));
    assert!(text.ends_with("\"nbformat_minor\": 5\n}"));
}
